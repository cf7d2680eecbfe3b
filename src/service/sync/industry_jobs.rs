//! Industry job synchronization: one full mirror pass per owner.

use std::collections::{HashMap, HashSet};

use sea_orm::{ActiveEnum, DatabaseConnection};

use entity::sea_orm_active_enums::JobStatus;

use crate::config::SyncConfig;
use crate::data::blueprint::BlueprintRepository;
use crate::data::industry_job::IndustryJobRepository;
use crate::error::Error;
use crate::esi::model::IndustryJobItem;
use crate::esi::EsiClient;
use crate::model::industry_job::SyncedIndustryJob;
use crate::model::owner::OwnerKind;
use crate::service::location::LocationService;
use crate::service::registry::RegistryService;
use crate::service::sync::begin_cycle;
use crate::util::eve::{CORPORATE_JOB_SYNC_SCOPES, PERSONAL_JOB_SYNC_SCOPES};
use crate::worker::queue::WorkerQueue;

/// Mirrors an owner's remote industry job listing into the local table.
pub struct IndustryJobSyncService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
    config: &'a SyncConfig,
}

impl<'a> IndustryJobSyncService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        esi_client: &'a EsiClient,
        config: &'a SyncConfig,
    ) -> Self {
        Self {
            db,
            esi_client,
            config,
        }
    }

    /// Runs one industry job sync pass for an owner.
    ///
    /// Each remote entry is matched to a stored blueprint before
    /// persistence; entries that cannot be matched safely are skipped with a
    /// warning and picked up again once a blueprint sync has caught up.
    /// Jobs no longer reported remotely are deleted. Facility locations in
    /// structures resolve through `queue` instead of blocking the pass.
    ///
    /// # Arguments
    ///
    /// * `owner_id` - The owner to sync
    /// * `queue` - Worker queue for deferred structure resolution
    pub async fn sync(&self, owner_id: i32, queue: &WorkerQueue) -> Result<(), Error> {
        let cycle = match begin_cycle(
            self.db,
            self.esi_client,
            self.config,
            owner_id,
            &CORPORATE_JOB_SYNC_SCOPES,
            &PERSONAL_JOB_SYNC_SCOPES,
        )
        .await?
        {
            Some(cycle) => cycle,
            None => return Ok(()),
        };

        let items = match OwnerKind::of(&cycle.owner, cycle.token.character_id) {
            OwnerKind::Corporate { corporation_id } => {
                self.esi_client
                    .get_corporation_industry_jobs(corporation_id, &cycle.token.access_token)
                    .await?
            }
            OwnerKind::Personal { character_id } => {
                self.esi_client
                    .get_character_industry_jobs(character_id, &cycle.token.access_token)
                    .await?
            }
        };
        let remote_count = items.len();

        // Who owns each referenced blueprint, for the ownership checks below.
        let mut blueprint_ids: Vec<i64> = items.iter().map(|item| item.blueprint_id).collect();
        blueprint_ids.sort_unstable();
        blueprint_ids.dedup();
        let blueprint_owners: HashMap<i64, i32> = BlueprintRepository::new(self.db)
            .get_by_item_ids(&blueprint_ids)
            .await?
            .into_iter()
            .map(|blueprint| (blueprint.item_id, blueprint.owner_id))
            .collect();

        let mut claimed_blueprints = HashSet::new();
        let mut jobs = Vec::with_capacity(items.len());
        for item in items {
            if let Some(job) = validate_job(
                cycle.owner.id,
                &blueprint_owners,
                &mut claimed_blueprints,
                item,
            ) {
                jobs.push(job);
            }
        }

        // Installer rows let the listing show names instead of raw IDs.
        let registry = RegistryService::new(self.db, self.esi_client);
        let mut installer_ids: Vec<i64> = jobs.iter().map(|job| job.installer_id).collect();
        installer_ids.sort_unstable();
        installer_ids.dedup();
        for installer_id in installer_ids {
            registry.ensure_character(installer_id).await?;
        }

        let locations = LocationService::new(self.db, self.esi_client, self.config);
        let mut location_ids: Vec<i64> = jobs.iter().map(|job| job.location_id).collect();
        location_ids.sort_unstable();
        location_ids.dedup();
        for location_id in location_ids {
            locations
                .get_or_enqueue(location_id, cycle.token.token_id, queue)
                .await?;
        }

        let repository = IndustryJobRepository::new(self.db);
        let mut kept_job_ids = Vec::with_capacity(jobs.len());
        for job in &jobs {
            repository.upsert(cycle.owner.id, job).await?;
            kept_job_ids.push(job.job_id);
        }
        let deleted = repository
            .delete_by_owner_except(cycle.owner.id, &kept_job_ids)
            .await?;

        tracing::info!(
            "Synced {} industry jobs for owner {} ({} remote entries, {} deleted)",
            kept_job_ids.len(),
            cycle.owner.id,
            remote_count,
            deleted
        );

        Ok(())
    }
}

/// Validates one raw job entry against the owner's stored blueprints.
///
/// Returns `None` for entries that cannot be persisted, each with a logged
/// reason: no facility location, a status [`JobStatus`] does not carry, a
/// blueprint that is not stored or is stored for another owner, or a
/// blueprint an earlier entry in the batch already claimed. The blueprint
/// column is unique, so only the first claim in a batch survives.
fn validate_job(
    owner_id: i32,
    blueprint_owners: &HashMap<i64, i32>,
    claimed_blueprints: &mut HashSet<i64>,
    item: IndustryJobItem,
) -> Option<SyncedIndustryJob> {
    let location_id = match item.facility_location_id() {
        Some(location_id) => location_id,
        None => {
            tracing::warn!("Skipping industry job {}: no facility location", item.job_id);
            return None;
        }
    };

    let status = match JobStatus::try_from_value(&item.status) {
        Ok(status) => status,
        Err(_) => {
            tracing::warn!(
                "Skipping industry job {}: unrecognized status {:?}",
                item.job_id,
                item.status
            );
            return None;
        }
    };

    match blueprint_owners.get(&item.blueprint_id) {
        None => {
            tracing::warn!(
                "Skipping industry job {}: blueprint {} is not stored",
                item.job_id,
                item.blueprint_id
            );
            return None;
        }
        Some(&blueprint_owner_id) if blueprint_owner_id != owner_id => {
            tracing::warn!(
                "Skipping industry job {}: blueprint {} belongs to another owner",
                item.job_id,
                item.blueprint_id
            );
            return None;
        }
        Some(_) => {}
    }

    if !claimed_blueprints.insert(item.blueprint_id) {
        tracing::warn!(
            "Skipping industry job {}: blueprint {} already claimed in this batch",
            item.job_id,
            item.blueprint_id
        );
        return None;
    }

    Some(SyncedIndustryJob {
        job_id: item.job_id,
        blueprint_id: item.blueprint_id,
        activity: item.activity_id,
        installer_id: item.installer_id,
        location_id,
        runs: item.runs,
        start_date: item.start_date.naive_utc(),
        end_date: item.end_date.naive_utc(),
        status,
    })
}
