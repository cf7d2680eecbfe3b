//! Blueprint models: normalized sync rows and listing summaries.

/// A remote blueprint row after normalization, ready for persistence.
///
/// Produced by the blueprint sync from raw [`crate::esi::model::BlueprintItem`]s:
/// sentinel encodings are normalized (`runs < 1` becomes unlimited, negative
/// singleton quantities become 1) and stacks that differ only by item ID are
/// merged with their quantities summed.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedBlueprint {
    pub item_id: i64,
    pub eve_type_id: i64,
    pub location_id: i64,
    pub location_flag: String,
    pub quantity: i32,
    /// Remaining licensed runs, `None` for an original with unlimited runs
    pub runs: Option<i32>,
    pub material_efficiency: i32,
    pub time_efficiency: i32,
}

/// One row of a user-facing blueprint listing.
///
/// `location` is populated only for users holding the location permission,
/// and degrades to a placeholder when the location row is still unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintSummary {
    pub item_id: i64,
    pub type_name: String,
    pub owner_name: String,
    pub location: Option<String>,
    pub material_efficiency: i32,
    pub time_efficiency: i32,
    pub is_original: bool,
    pub runs: Option<i32>,
    pub quantity: i32,
    /// Whether an industry job currently holds this blueprint
    pub in_use: bool,
}
