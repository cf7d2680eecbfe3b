//! Response models for the ESI endpoints Brokkr consumes.
//!
//! Only the fields the sync pipeline actually reads are deserialized, ESI
//! responses carry plenty more that serde ignores. Models derive `Serialize`
//! as well so tests can feed them straight into mocked endpoint bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response from the `/status/` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub players: i32,
    pub server_version: String,
    pub start_time: DateTime<Utc>,
    /// Set when the server is in VIP mode, reachable but closed to players
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip: Option<bool>,
}

/// Response from the `/universe/systems/{system_id}/` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSystem {
    pub system_id: i64,
    pub name: String,
    pub security_status: f64,
}

/// Response from the `/universe/stations/{station_id}/` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: i64,
    pub name: String,
    pub system_id: i64,
    pub type_id: i64,
    /// Owning NPC corporation, absent for a handful of special stations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<i64>,
}

/// Response from the `/universe/structures/{structure_id}/` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    pub owner_id: i64,
    pub solar_system_id: i64,
    /// Absent when the requesting character cannot see the structure type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<i64>,
}

/// Response from the `/universe/types/{type_id}/` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub type_id: i64,
    pub name: String,
}

/// Response from the `/characters/{character_id}/` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub name: String,
    pub corporation_id: i64,
}

/// Response from the `/corporations/{corporation_id}/` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporationInfo {
    pub name: String,
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alliance_id: Option<i64>,
}

/// One entry from the corporation or character blueprints endpoints.
///
/// `quantity` and `runs` carry ESI's sentinel encodings: quantity `-1` marks a
/// singleton original, `-2` a copy, and runs `-1` an original with unlimited
/// runs. The sync service normalizes these before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintItem {
    pub item_id: i64,
    pub location_flag: String,
    pub location_id: i64,
    pub material_efficiency: i32,
    pub quantity: i32,
    pub runs: i32,
    pub time_efficiency: i32,
    pub type_id: i64,
}

/// One entry from the corporation or character industry jobs endpoints.
///
/// The corporation endpoint reports the facility as `location_id` while the
/// character endpoint calls the same field `station_id`, use
/// [`IndustryJobItem::facility_location_id`] instead of either field directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryJobItem {
    pub activity_id: i32,
    pub blueprint_id: i64,
    pub end_date: DateTime<Utc>,
    pub installer_id: i64,
    pub job_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    pub runs: i32,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<i64>,
    pub status: String,
}

impl IndustryJobItem {
    /// Location ID of the facility the job runs in, whichever field variant
    /// the endpoint used.
    pub fn facility_location_id(&self) -> Option<i64> {
        self.location_id.or(self.station_id)
    }
}

/// One entry from the corporation or character assets endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetItem {
    pub item_id: i64,
    pub location_id: i64,
    pub type_id: i64,
}

/// Response from the EVE SSO token endpoint for a refresh grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
    /// SSO may rotate the refresh token, absent means keep using the old one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}
