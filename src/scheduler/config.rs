//! Schedule configuration for the periodic owner syncs.
//!
//! The three sync kinds run on offset cron schedules so their ESI load
//! never lands in the same minute, and each run staggers its per-owner
//! jobs across a window instead of queueing them in one burst.

use chrono::Duration;

pub mod blueprints {
    use super::*;

    /// Hourly at minute 15.
    pub const CRON_EXPRESSION: &str = "0 15 * * * *";

    /// Window each run staggers its owner jobs across.
    pub const STAGGER_WINDOW: Duration = Duration::minutes(10);
}

pub mod industry_jobs {
    use super::*;

    /// Hourly at minute 45, opposite the blueprint sync.
    pub const CRON_EXPRESSION: &str = "0 45 * * * *";

    /// Window each run staggers its owner jobs across.
    pub const STAGGER_WINDOW: Duration = Duration::minutes(10);
}

pub mod locations {
    use super::*;

    /// Every three hours at minute 30. Container layouts change rarely
    /// and the asset listing is the heaviest of the three endpoints.
    pub const CRON_EXPRESSION: &str = "0 30 */3 * * *";

    /// Window each run staggers its owner jobs across.
    pub const STAGGER_WINDOW: Duration = Duration::minutes(10);
}
