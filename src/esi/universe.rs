//! Universe endpoints: solar systems, stations, structures, and types.

use super::model::{SolarSystem, Station, Structure, TypeInfo};
use super::EsiClient;
use crate::error::esi::EsiError;

impl EsiClient {
    /// Fetches a solar system from the public systems endpoint.
    pub async fn get_solar_system(&self, solar_system_id: i64) -> Result<SolarSystem, EsiError> {
        self.get_json(&format!("/universe/systems/{}/", solar_system_id), None)
            .await
    }

    /// Fetches an NPC station from the public stations endpoint.
    pub async fn get_station(&self, station_id: i64) -> Result<Station, EsiError> {
        self.get_json(&format!("/universe/stations/{}/", station_id), None)
            .await
    }

    /// Fetches a player-owned structure.
    ///
    /// Requires a token with `esi-universe.read_structures.v1`, and ESI only
    /// answers for characters with docking access, everyone else gets a 403.
    pub async fn get_structure(
        &self,
        structure_id: i64,
        access_token: &str,
    ) -> Result<Structure, EsiError> {
        self.get_json(
            &format!("/universe/structures/{}/", structure_id),
            Some(access_token),
        )
        .await
    }

    /// Fetches an item type from the public types endpoint.
    pub async fn get_type(&self, type_id: i64) -> Result<TypeInfo, EsiError> {
        self.get_json(&format!("/universe/types/{}/", type_id), None)
            .await
    }
}
