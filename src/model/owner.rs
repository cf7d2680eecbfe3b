//! Owner models for registration, listing, and sync dispatch.

/// The remote subject an owner row synchronizes against.
///
/// Corporate owners read the corporation endpoints with the linked
/// character's token, personal owners read the character endpoints.
/// Every sync path matches on this exhaustively so a new kind cannot
/// be added without deciding its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Corporate { corporation_id: i64 },
    Personal { character_id: i64 },
}

impl OwnerKind {
    /// Classifies `owner`, with `character_id` as the subject for
    /// personal owners.
    pub fn of(owner: &entity::owner::Model, character_id: i64) -> Self {
        match owner.corporation_id {
            Some(corporation_id) => Self::Corporate { corporation_id },
            None => Self::Personal { character_id },
        }
    }
}

/// One row of a user's owner management listing.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerSummary {
    pub id: i32,
    /// Corporation name for corporate owners, character name for personal ones
    pub name: String,
    pub is_corporate: bool,
    pub is_active: bool,
    pub blueprint_count: u64,
}
