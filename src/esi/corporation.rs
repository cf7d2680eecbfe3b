//! Corporation endpoints: public info plus the authenticated blueprint,
//! industry job, and asset listings used for corporate owners.

use super::model::{AssetItem, BlueprintItem, CorporationInfo, IndustryJobItem};
use super::EsiClient;
use crate::error::esi::EsiError;

impl EsiClient {
    /// Fetches public corporation info.
    pub async fn get_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<CorporationInfo, EsiError> {
        self.get_json(&format!("/corporations/{}/", corporation_id), None)
            .await
    }

    /// Fetches all pages of a corporation's blueprints.
    ///
    /// Requires `esi-corporations.read_blueprints.v1` and the Director role.
    pub async fn get_corporation_blueprints(
        &self,
        corporation_id: i64,
        access_token: &str,
    ) -> Result<Vec<BlueprintItem>, EsiError> {
        self.get_paginated(
            &format!("/corporations/{}/blueprints/", corporation_id),
            access_token,
        )
        .await
    }

    /// Fetches all pages of a corporation's industry jobs.
    ///
    /// Requires `esi-industry.read_corporation_jobs.v1` and the Factory
    /// Manager role.
    pub async fn get_corporation_industry_jobs(
        &self,
        corporation_id: i64,
        access_token: &str,
    ) -> Result<Vec<IndustryJobItem>, EsiError> {
        self.get_paginated(
            &format!("/corporations/{}/industry/jobs/", corporation_id),
            access_token,
        )
        .await
    }

    /// Fetches all pages of a corporation's assets.
    ///
    /// Requires `esi-assets.read_corporation_assets.v1` and the Director role.
    pub async fn get_corporation_assets(
        &self,
        corporation_id: i64,
        access_token: &str,
    ) -> Result<Vec<AssetItem>, EsiError> {
        self.get_paginated(
            &format!("/corporations/{}/assets/", corporation_id),
            access_token,
        )
        .await
    }
}
