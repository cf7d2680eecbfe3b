//! Worker job definitions for background task processing.
//!
//! This module defines the `WorkerJob` enum representing all types of background jobs that
//! can be dispatched to the worker queue. Each job variant contains the minimal data needed
//! to perform the task (owner IDs to sync, structure locations to resolve) plus a stable
//! identity string the queue uses for duplicate suppression.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Background job types for EVE Online blueprint data synchronization.
///
/// Each variant represents a specific type of background task that can be enqueued to the
/// worker queue. The scheduler creates owner sync jobs on a staggered cadence, and sync
/// services enqueue structure resolution jobs when they encounter structures they cannot
/// resolve inline.
///
/// # Job Types
/// - `SyncBlueprints` - Reconcile one owner's blueprints against ESI
/// - `SyncIndustryJobs` - Reconcile one owner's industry jobs against ESI
/// - `SyncLocations` - Rebuild one owner's asset container hierarchy
/// - `ResolveStructure` - Fetch a player-owned structure's details with a token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum WorkerJob {
    /// Synchronize blueprints for a specific owner.
    ///
    /// Fetches the owner's blueprints from ESI (corporation or character endpoint depending
    /// on the owner kind), normalizes and merges the remote rows, and reconciles them
    /// against the database: new blueprints are inserted, changed ones updated, and rows
    /// no longer reported by ESI deleted.
    ///
    /// # Fields
    /// - `owner_id` - Database ID of the owner to sync
    SyncBlueprints {
        /// Database ID of the owner to sync.
        owner_id: i32,
    },

    /// Synchronize industry jobs for a specific owner.
    ///
    /// Fetches the owner's industry jobs from ESI and reconciles them against the database.
    /// Jobs referencing blueprints that have not been synced yet are skipped until a
    /// blueprint sync catches up.
    ///
    /// # Fields
    /// - `owner_id` - Database ID of the owner to sync
    SyncIndustryJobs {
        /// Database ID of the owner to sync.
        owner_id: i32,
    },

    /// Rebuild the asset container hierarchy for a specific owner.
    ///
    /// Fetches the owner's assets from ESI and links container locations (ships, hangars,
    /// cans) to their parent station or structure so blueprints stored inside containers
    /// can display a meaningful location.
    ///
    /// # Fields
    /// - `owner_id` - Database ID of the owner to sync
    SyncLocations {
        /// Database ID of the owner to sync.
        owner_id: i32,
    },

    /// Resolve a player-owned structure's name and position.
    ///
    /// Structure lookups need an authenticated token with docking access, so syncs defer
    /// them to this job instead of blocking on each structure inline. Carries the token
    /// row to authenticate with; the identity ignores it so concurrent syncs holding
    /// different tokens still collapse to a single fetch per structure.
    ///
    /// # Fields
    /// - `location_id` - Structure location ID to resolve
    /// - `token_id` - Database ID of the ESI token to authenticate with
    ResolveStructure {
        /// Structure location ID to resolve.
        location_id: i64,
        /// Database ID of the ESI token to authenticate with.
        token_id: i32,
    },
}

impl WorkerJob {
    /// Stable identity used for duplicate suppression in the worker queue.
    ///
    /// Two jobs with the same identity are the same unit of work: queueing the second is
    /// a no-op while the first is still pending.
    pub fn identity(&self) -> String {
        match self {
            WorkerJob::SyncBlueprints { owner_id } => format!("sync_blueprints:{}", owner_id),
            WorkerJob::SyncIndustryJobs { owner_id } => {
                format!("sync_industry_jobs:{}", owner_id)
            }
            WorkerJob::SyncLocations { owner_id } => format!("sync_locations:{}", owner_id),
            WorkerJob::ResolveStructure { location_id, .. } => {
                format!("resolve_structure:{}", location_id)
            }
        }
    }
}

impl fmt::Display for WorkerJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
