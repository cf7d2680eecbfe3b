//! Token models passed between the SSO callback boundary and services.

use chrono::NaiveDateTime;

/// A freshly issued ESI token handed in by the caller's SSO flow.
///
/// Brokkr does not run the authorization code exchange itself, the hosting
/// application completes SSO and passes the resulting grant here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEsiToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Space-separated scope list exactly as issued by SSO
    pub scopes: String,
    pub expires_at: NaiveDateTime,
}

impl NewEsiToken {
    /// True when the token carries every scope in `required`.
    pub fn has_scopes(&self, required: &[&str]) -> bool {
        let granted: Vec<&str> = self.scopes.split_whitespace().collect();
        required.iter().all(|scope| granted.contains(scope))
    }
}

/// A usable access token resolved for an owner's sync cycle.
///
/// Carries the character the token belongs to (needed for character endpoint
/// paths) and the token row ID (needed to enqueue structure resolutions that
/// re-authenticate later).
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerToken {
    pub access_token: String,
    pub character_id: i64,
    pub token_id: i32,
}
