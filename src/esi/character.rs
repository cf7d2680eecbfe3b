//! Character endpoints: public info plus the authenticated blueprint,
//! industry job, and asset listings used for personal owners.

use super::model::{AssetItem, BlueprintItem, CharacterInfo, IndustryJobItem};
use super::EsiClient;
use crate::error::esi::EsiError;

impl EsiClient {
    /// Fetches public character info.
    pub async fn get_character(&self, character_id: i64) -> Result<CharacterInfo, EsiError> {
        self.get_json(&format!("/characters/{}/", character_id), None)
            .await
    }

    /// Fetches all pages of a character's personal blueprints.
    ///
    /// Requires `esi-characters.read_blueprints.v1`.
    pub async fn get_character_blueprints(
        &self,
        character_id: i64,
        access_token: &str,
    ) -> Result<Vec<BlueprintItem>, EsiError> {
        self.get_paginated(
            &format!("/characters/{}/blueprints/", character_id),
            access_token,
        )
        .await
    }

    /// Fetches a character's industry jobs.
    ///
    /// Requires `esi-industry.read_character_jobs.v1`.
    pub async fn get_character_industry_jobs(
        &self,
        character_id: i64,
        access_token: &str,
    ) -> Result<Vec<IndustryJobItem>, EsiError> {
        self.get_paginated(
            &format!("/characters/{}/industry/jobs/", character_id),
            access_token,
        )
        .await
    }

    /// Fetches all pages of a character's personal assets.
    ///
    /// Requires `esi-assets.read_assets.v1`.
    pub async fn get_character_assets(
        &self,
        character_id: i64,
        access_token: &str,
    ) -> Result<Vec<AssetItem>, EsiError> {
        self.get_paginated(&format!("/characters/{}/assets/", character_id), access_token)
            .await
    }
}
