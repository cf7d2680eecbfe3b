//! Request models: transition outcomes and listing summaries.

use chrono::NaiveDateTime;

use entity::sea_orm_active_enums::RequestStatus;

/// Result of attempting a request status transition.
///
/// Authorization misses and invalid state changes are normal outcomes under
/// concurrent UI use (two fulfillers racing for the same request), so they
/// come back as a user-visible message rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The transition was applied, carries the updated request
    Applied(entity::request::Model),
    /// The transition was refused, carries the message to show the user
    Denied(String),
}

impl TransitionOutcome {
    /// True when the transition went through.
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}

/// One row of a request listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSummary {
    pub id: i32,
    pub blueprint_item_id: i64,
    pub blueprint_type_name: String,
    pub owner_name: String,
    pub requesting_user_name: String,
    pub fulfilling_user_name: Option<String>,
    /// Requested licensed runs, `None` when the requester wants the original
    pub runs: Option<i32>,
    pub status: RequestStatus,
    pub created_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}
