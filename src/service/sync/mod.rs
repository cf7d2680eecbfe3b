//! Owner synchronization against ESI.
//!
//! One service per sync kind: blueprints, industry jobs, and asset
//! container locations. Each runs as an independent background unit per
//! owner, re-entrant and idempotent; the worker queue's identity
//! deduplication keeps at most one cycle per (owner, kind) in flight.
//!
//! Every cycle starts the same way: load the owner, resolve a token with
//! the operation's scope set, and pass the error budget gate. Token errors
//! are terminal for the cycle and wait for the next schedule; offline and
//! budget errors classify as transient and get the cycle requeued.

pub mod blueprints;
pub mod industry_jobs;
pub mod locations;

use sea_orm::DatabaseConnection;

use crate::config::SyncConfig;
use crate::data::owner::OwnerRepository;
use crate::error::Error;
use crate::esi::{EsiClient, EsiStatus};
use crate::model::token::OwnerToken;
use crate::service::token::TokenService;

/// Owner, token, and status snapshot one sync pass works from.
pub(crate) struct SyncCycle {
    pub owner: entity::owner::Model,
    pub token: OwnerToken,
    pub status: EsiStatus,
}

/// Readies a sync pass for one owner.
///
/// Returns `None` when the owner is gone or paused, which ends the pass
/// without error. The scope set is picked by owner variant before token
/// resolution; the status snapshot has already passed the error budget
/// gate when this returns.
pub(crate) async fn begin_cycle(
    db: &DatabaseConnection,
    esi_client: &EsiClient,
    config: &SyncConfig,
    owner_id: i32,
    corporate_scopes: &[&str],
    personal_scopes: &[&str],
) -> Result<Option<SyncCycle>, Error> {
    let owner = match OwnerRepository::new(db).get_by_id(owner_id).await? {
        Some(owner) => owner,
        None => {
            tracing::debug!("Owner {} is gone, nothing to sync", owner_id);
            return Ok(None);
        }
    };
    if !owner.is_active {
        tracing::debug!("Owner {} is paused, skipping sync", owner_id);
        return Ok(None);
    }

    let required_scopes = match owner.corporation_id {
        Some(_) => corporate_scopes,
        None => personal_scopes,
    };
    let token = TokenService::new(db, esi_client)
        .require_token(&owner, required_scopes)
        .await?;

    let status = esi_client.get_status().await?;
    status.raise_for_status(config.error_limit_threshold)?;

    Ok(Some(SyncCycle {
        owner,
        token,
        status,
    }))
}
