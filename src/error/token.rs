use thiserror::Error;

/// Errors resolving a usable ESI token for an owner's sync cycle.
///
/// Each variant is terminal for the cycle it occurs in: the sync is skipped
/// and picked up again on the next scheduled pass once the operator has
/// re-registered the owner with a fresh token.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Owner {owner_id} has no character configured for sync")]
    NoCharacterConfigured { owner_id: i32 },
    #[error("No token for character {character_id} carries the required scopes")]
    InsufficientPermission { character_id: i64 },
    #[error("No usable token found for character {character_id}")]
    Invalid { character_id: i64 },
    #[error("Token for character {character_id} is expired and cannot be refreshed")]
    Expired { character_id: i64 },
}
