use thiserror::Error;

/// Errors related to user authorization
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User {0} not found")]
    UserNotFound(i32),
    #[error("User {user_id} does not own character {character_id}")]
    CharacterNotOwned { user_id: i32, character_id: i64 },
    #[error("User {user_id} is missing the {permission:?} permission")]
    MissingPermission {
        user_id: i32,
        permission: &'static str,
    },
}
