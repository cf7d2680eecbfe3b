use chrono::{DateTime, Duration, Utc};

use entity::sea_orm_active_enums::JobStatus;

use crate::esi::model::{
    AssetItem, BlueprintItem, CharacterInfo, CorporationInfo, IndustryJobItem, ServerStatus,
    SolarSystem, Station, Structure, TypeInfo,
};
use crate::model::blueprint::SyncedBlueprint;
use crate::model::industry_job::SyncedIndustryJob;
use crate::model::token::NewEsiToken;

pub fn mock_server_status(vip: Option<bool>) -> ServerStatus {
    ServerStatus {
        players: 24_532,
        server_version: "2794925".to_string(),
        start_time: DateTime::parse_from_rfc3339("2026-02-11T11:02:14Z")
            .unwrap()
            .with_timezone(&Utc),
        vip,
    }
}

pub fn mock_solar_system() -> SolarSystem {
    SolarSystem {
        system_id: 30_000_142,
        name: "Jita".to_string(),
        security_status: 0.9459,
    }
}

pub fn mock_station() -> Station {
    Station {
        station_id: 60_003_760,
        name: "Jita IV - Moon 4 - Caldari Navy Assembly Plant".to_string(),
        system_id: 30_000_142,
        type_id: 52_678,
        owner: Some(1_000_035),
    }
}

pub fn mock_structure() -> Structure {
    Structure {
        name: "Jita - Autumn Forge".to_string(),
        owner_id: 98_784_257,
        solar_system_id: 30_000_142,
        type_id: Some(35_827),
    }
}

pub fn mock_type_info(type_id: i64) -> TypeInfo {
    TypeInfo {
        type_id,
        name: format!("Type #{}", type_id),
    }
}

pub fn mock_character_info(corporation_id: i64) -> CharacterInfo {
    CharacterInfo {
        name: "Hyziri".to_string(),
        corporation_id,
    }
}

pub fn mock_corporation_info(alliance_id: Option<i64>) -> CorporationInfo {
    CorporationInfo {
        name: "The Order of Autumn".to_string(),
        ticker: "F4LL.".to_string(),
        alliance_id,
    }
}

/// Raw blueprint entry carrying ESI's sentinel encodings for an original.
pub fn mock_blueprint_item(item_id: i64) -> BlueprintItem {
    BlueprintItem {
        item_id,
        location_flag: "Hangar".to_string(),
        location_id: 60_003_760,
        material_efficiency: 10,
        quantity: -1,
        runs: -1,
        time_efficiency: 20,
        type_id: 33519,
    }
}

pub fn mock_industry_job_item(job_id: i64, blueprint_id: i64) -> IndustryJobItem {
    IndustryJobItem {
        activity_id: 5,
        blueprint_id,
        end_date: Utc::now() + Duration::days(3),
        installer_id: 2_119_123_456,
        job_id,
        location_id: Some(60_003_760),
        runs: 10,
        start_date: Utc::now(),
        station_id: None,
        status: "active".to_string(),
    }
}

pub fn mock_asset_item(item_id: i64, location_id: i64, type_id: i64) -> AssetItem {
    AssetItem {
        item_id,
        location_id,
        type_id,
    }
}

pub fn mock_new_token(scopes: &str) -> NewEsiToken {
    NewEsiToken {
        access_token: "access-1".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        scopes: scopes.to_string(),
        expires_at: Utc::now().naive_utc() + Duration::seconds(1199),
    }
}

/// Already normalized blueprint row, single original with no research.
pub fn mock_synced_blueprint(
    item_id: i64,
    eve_type_id: i64,
    location_id: i64,
) -> SyncedBlueprint {
    SyncedBlueprint {
        item_id,
        eve_type_id,
        location_id,
        location_flag: "Hangar".to_string(),
        quantity: 1,
        runs: None,
        material_efficiency: 0,
        time_efficiency: 0,
    }
}

pub fn mock_synced_industry_job(
    job_id: i64,
    blueprint_id: i64,
    location_id: i64,
) -> SyncedIndustryJob {
    SyncedIndustryJob {
        job_id,
        blueprint_id,
        activity: 5,
        installer_id: 2_119_123_456,
        location_id,
        runs: 10,
        start_date: Utc::now().naive_utc(),
        end_date: (Utc::now() + Duration::days(3)).naive_utc(),
        status: JobStatus::Active,
    }
}
