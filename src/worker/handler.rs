//! Dispatch from queued jobs to the services that execute them.

use sea_orm::DatabaseConnection;

use crate::config::SyncConfig;
use crate::error::Error;
use crate::esi::EsiClient;
use crate::model::worker::WorkerJob;
use crate::service::location::LocationService;
use crate::service::retry::RetryContext;
use crate::service::sync::blueprints::BlueprintSyncService;
use crate::service::sync::industry_jobs::IndustryJobSyncService;
use crate::service::sync::locations::LocationSyncService;
use crate::worker::queue::WorkerQueue;

/// Executes queued jobs by routing each variant to its service.
///
/// Holds clones of the shared process state so execution tasks do not
/// borrow from the pool. Blueprint and job syncs receive the queue itself,
/// letting them enqueue follow-up structure resolutions.
pub struct WorkerJobHandler {
    db: DatabaseConnection,
    esi_client: EsiClient,
    queue: WorkerQueue,
    sync: SyncConfig,
}

impl WorkerJobHandler {
    pub fn new(
        db: DatabaseConnection,
        esi_client: EsiClient,
        queue: WorkerQueue,
        sync: SyncConfig,
    ) -> Self {
        Self {
            db,
            esi_client,
            queue,
            sync,
        }
    }

    /// Executes one job to completion.
    ///
    /// Transient failures get a few in-process attempts with backoff; the
    /// sync services commit incrementally and upsert everywhere, so a rerun
    /// picks up where the failed attempt stopped. Errors that survive bubble
    /// up to the pool, which defers or drops the job per the error's retry
    /// strategy.
    pub async fn handle(&self, job: &WorkerJob) -> Result<(), Error> {
        RetryContext::new()
            .execute_with_retry(&job.to_string(), || self.dispatch(job))
            .await
    }

    async fn dispatch(&self, job: &WorkerJob) -> Result<(), Error> {
        match job {
            WorkerJob::SyncBlueprints { owner_id } => {
                BlueprintSyncService::new(&self.db, &self.esi_client, &self.sync)
                    .sync(*owner_id, &self.queue)
                    .await
            }
            WorkerJob::SyncIndustryJobs { owner_id } => {
                IndustryJobSyncService::new(&self.db, &self.esi_client, &self.sync)
                    .sync(*owner_id, &self.queue)
                    .await
            }
            WorkerJob::SyncLocations { owner_id } => {
                LocationSyncService::new(&self.db, &self.esi_client, &self.sync)
                    .sync(*owner_id)
                    .await
            }
            WorkerJob::ResolveStructure {
                location_id,
                token_id,
            } => {
                LocationService::new(&self.db, &self.esi_client, &self.sync)
                    .resolve_structure_job(*location_id, *token_id)
                    .await
            }
        }
    }
}
