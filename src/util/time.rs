//! Time and date calculation utilities.
//!
//! This module provides functions for time-based staleness checks. These utilities are
//! particularly important for determining when cached location rows need to be refreshed
//! from ESI, ensuring data stays current without making unnecessary API calls.

use chrono::{Duration, NaiveDateTime, Utc};

/// Checks whether a timestamp is older than the given maximum age relative to now.
///
/// Used by the location resolver to decide between reusing a cached row and refreshing it
/// from ESI, with different maximum ages for populated rows and empty placeholder rows.
///
/// # Arguments
/// - `timestamp` - The UTC timestamp to check, typically a row's `updated_at`
/// - `max_age` - Maximum acceptable age before the timestamp counts as stale
pub fn is_older_than(timestamp: NaiveDateTime, max_age: Duration) -> bool {
    Utc::now().naive_utc() - timestamp > max_age
}
