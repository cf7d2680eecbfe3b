//! EVE Online-specific utility functions and constants.
//!
//! This module provides utilities for working with EVE Online data, including location ID
//! classification against official ID ranges and the ESI scope sets required to register
//! blueprint owners. Classifying location IDs locally lets the location resolver pick the
//! right ESI endpoint without a lookup request, and keeps token-bearing structure requests
//! limited to IDs that can actually be structures.

/// EVE type ID of the "Solar System" type.
///
/// Location rows that represent a solar system itself (blueprints in space, assets in
/// deployable structures anchored outside stations) use this as their type so the UI layer
/// can render them consistently with docked locations.
pub const EVE_TYPE_ID_SOLAR_SYSTEM: i64 = 5;

const SCOPE_READ_STRUCTURES: &str = "esi-universe.read_structures.v1";
const SCOPE_CORPORATION_BLUEPRINTS: &str = "esi-corporations.read_blueprints.v1";
const SCOPE_CORPORATION_ASSETS: &str = "esi-assets.read_corporation_assets.v1";
const SCOPE_CORPORATION_JOBS: &str = "esi-industry.read_corporation_jobs.v1";
const SCOPE_CHARACTER_BLUEPRINTS: &str = "esi-characters.read_blueprints.v1";
const SCOPE_CHARACTER_ASSETS: &str = "esi-assets.read_assets.v1";
const SCOPE_CHARACTER_JOBS: &str = "esi-industry.read_character_jobs.v1";

/// ESI scopes required to register a corporation as a blueprint owner.
///
/// The registering character must hold the Director role in-game for the corporation
/// endpoints to return data, that check happens on ESI's side at sync time.
pub const CORPORATE_OWNER_SCOPES: [&str; 4] = [
    SCOPE_READ_STRUCTURES,
    SCOPE_CORPORATION_BLUEPRINTS,
    SCOPE_CORPORATION_ASSETS,
    SCOPE_CORPORATION_JOBS,
];

/// ESI scopes required to register a character as a personal blueprint owner.
pub const PERSONAL_OWNER_SCOPES: [&str; 4] = [
    SCOPE_READ_STRUCTURES,
    SCOPE_CHARACTER_BLUEPRINTS,
    SCOPE_CHARACTER_ASSETS,
    SCOPE_CHARACTER_JOBS,
];

// Per-operation scope sets the sync services request tokens with. Each pairs
// the operation's read scope with the structures scope; structure lookups
// authenticate with the same token as the sync that found them.

pub const CORPORATE_BLUEPRINT_SYNC_SCOPES: [&str; 2] =
    [SCOPE_READ_STRUCTURES, SCOPE_CORPORATION_BLUEPRINTS];
pub const PERSONAL_BLUEPRINT_SYNC_SCOPES: [&str; 2] =
    [SCOPE_READ_STRUCTURES, SCOPE_CHARACTER_BLUEPRINTS];
pub const CORPORATE_JOB_SYNC_SCOPES: [&str; 2] = [SCOPE_READ_STRUCTURES, SCOPE_CORPORATION_JOBS];
pub const PERSONAL_JOB_SYNC_SCOPES: [&str; 2] = [SCOPE_READ_STRUCTURES, SCOPE_CHARACTER_JOBS];
pub const CORPORATE_ASSET_SYNC_SCOPES: [&str; 2] =
    [SCOPE_READ_STRUCTURES, SCOPE_CORPORATION_ASSETS];
pub const PERSONAL_ASSET_SYNC_SCOPES: [&str; 2] = [SCOPE_READ_STRUCTURES, SCOPE_CHARACTER_ASSETS];

/// Broad classification of an EVE location ID by CCP's documented ID ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// Solar system, resolvable via the public systems endpoint
    SolarSystem,
    /// NPC station, resolvable via the public stations endpoint
    Station,
    /// Player-owned structure, resolvable only with a token that has docking access
    Structure,
    /// Anything else: asset containers, ships, wrapped deliveries
    Unknown,
}

/// Classifies a location ID into the EVE entity kind it can refer to.
///
/// EVE Online allocates entity IDs from fixed ranges documented by CCP, so the kind of
/// location an ID refers to can be determined without an API request. IDs outside all
/// known ranges are usually item IDs of asset containers, which only become resolvable
/// once an asset sync sees the container and links it to its parent.
///
/// # Valid Location ID Ranges
/// - `30,000,000 - 33,000,000`: solar systems (including wormhole and Abyssal space)
/// - `60,000,000 - 64,000,000`: NPC stations
/// - `>= 1,000,000,000,000`: player-owned structures (Upwell)
///
/// # Arguments
/// - `id` - The location ID to classify
///
/// # Example
/// ```ignore
/// assert_eq!(classify_location_id(30_000_142), LocationKind::SolarSystem); // Jita
/// assert_eq!(classify_location_id(60_003_760), LocationKind::Station);     // Jita 4-4
/// ```
pub fn classify_location_id(id: i64) -> LocationKind {
    match id {
        30_000_000..=33_000_000 => LocationKind::SolarSystem,
        60_000_000..=64_000_000 => LocationKind::Station,
        1_000_000_000_000.. => LocationKind::Structure,
        _ => LocationKind::Unknown,
    }
}

/// Validates whether a location ID falls within the solar system ID range.
pub fn is_solar_system_id(id: i64) -> bool {
    matches!(id, 30_000_000..=33_000_000)
}

/// Validates whether a location ID falls within the NPC station ID range.
pub fn is_station_id(id: i64) -> bool {
    matches!(id, 60_000_000..=64_000_000)
}

/// Validates whether a location ID falls within the player-owned structure ID range.
pub fn is_structure_id(id: i64) -> bool {
    id >= 1_000_000_000_000
}
