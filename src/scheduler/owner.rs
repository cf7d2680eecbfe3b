//! Fan-out of periodic sync jobs across registered owners.

use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::data::owner::OwnerRepository;
use crate::error::Error;
use crate::model::worker::WorkerJob;
use crate::scheduler::{config, schedule::stagger};
use crate::worker::queue::WorkerQueue;

/// Queues a blueprint sync for every active owner.
pub async fn schedule_blueprint_syncs(
    db: DatabaseConnection,
    queue: WorkerQueue,
) -> Result<usize, Error> {
    schedule_owner_syncs(&db, &queue, config::blueprints::STAGGER_WINDOW, |owner_id| {
        WorkerJob::SyncBlueprints { owner_id }
    })
    .await
}

/// Queues an industry job sync for every active owner.
pub async fn schedule_industry_job_syncs(
    db: DatabaseConnection,
    queue: WorkerQueue,
) -> Result<usize, Error> {
    schedule_owner_syncs(
        &db,
        &queue,
        config::industry_jobs::STAGGER_WINDOW,
        |owner_id| WorkerJob::SyncIndustryJobs { owner_id },
    )
    .await
}

/// Queues an asset container sync for every active owner.
pub async fn schedule_location_syncs(
    db: DatabaseConnection,
    queue: WorkerQueue,
) -> Result<usize, Error> {
    schedule_owner_syncs(&db, &queue, config::locations::STAGGER_WINDOW, |owner_id| {
        WorkerJob::SyncLocations { owner_id }
    })
    .await
}

/// Staggers one sync job per active owner across the window.
///
/// Returns how many jobs were actually queued. Owners whose sync is still
/// queued or running from an earlier cycle are suppressed by the queue's
/// identity check, so a slow cycle never stacks up behind itself.
async fn schedule_owner_syncs<F>(
    db: &DatabaseConnection,
    queue: &WorkerQueue,
    window: Duration,
    to_job: F,
) -> Result<usize, Error>
where
    F: Fn(i32) -> WorkerJob,
{
    let owners = OwnerRepository::new(db).get_active().await?;
    let jobs: Vec<WorkerJob> = owners.into_iter().map(|owner| to_job(owner.id)).collect();

    let mut scheduled = 0;
    for (job, run_at) in stagger(jobs, window) {
        if queue.schedule(job, run_at) {
            scheduled += 1;
        }
    }

    Ok(scheduled)
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, DbBackend, DbErr, Schema};

    use crate::data::owner::OwnerRepository;
    use crate::scheduler::owner::{schedule_blueprint_syncs, schedule_industry_job_syncs};
    use crate::util::test::setup::{
        test_setup, test_setup_create_owner, test_setup_create_user_with_character, TestSetup,
    };
    use crate::worker::queue::WorkerQueue;

    async fn setup() -> Result<(TestSetup, Vec<entity::owner::Model>), DbErr> {
        let test = test_setup().await;
        let db = &test.db;

        let schema = Schema::new(DbBackend::Sqlite);
        let stmts = vec![
            schema.create_table_from_entity(entity::prelude::EveCorporation),
            schema.create_table_from_entity(entity::prelude::EveCharacter),
            schema.create_table_from_entity(entity::prelude::User),
            schema.create_table_from_entity(entity::prelude::UserCharacter),
            schema.create_table_from_entity(entity::prelude::Owner),
        ];
        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        let mut owners = Vec::new();
        for character_id in [1_001, 1_002, 1_003] {
            let (_, user_character) = test_setup_create_user_with_character(
                db,
                &format!("Pilot {}", character_id),
                character_id,
                98_784_257,
            )
            .await?;
            owners.push(test_setup_create_owner(db, user_character.id, None).await?);
        }

        Ok((test, owners))
    }

    /// Should queue one sync per active owner and skip paused ones
    #[tokio::test]
    async fn schedules_active_owners_only() {
        let (test, owners) = setup().await.unwrap();
        OwnerRepository::new(&test.db)
            .set_active(owners[2].id, false)
            .await
            .unwrap();

        let queue = WorkerQueue::new();
        let scheduled = schedule_blueprint_syncs(test.db.clone(), queue.clone())
            .await
            .unwrap();

        assert_eq!(scheduled, 2);
        assert_eq!(queue.len(), 2);
    }

    /// Should not stack a second sync behind one still in the queue
    #[tokio::test]
    async fn pending_syncs_are_not_duplicated() {
        let (test, _) = setup().await.unwrap();

        let queue = WorkerQueue::new();
        let first = schedule_blueprint_syncs(test.db.clone(), queue.clone())
            .await
            .unwrap();
        let second = schedule_blueprint_syncs(test.db.clone(), queue.clone())
            .await
            .unwrap();

        assert_eq!(first, 3);
        assert_eq!(second, 0);
        assert_eq!(queue.len(), 3);
    }

    /// Should keep different sync kinds for the same owner apart
    #[tokio::test]
    async fn sync_kinds_do_not_collide() {
        let (test, _) = setup().await.unwrap();

        let queue = WorkerQueue::new();
        schedule_blueprint_syncs(test.db.clone(), queue.clone())
            .await
            .unwrap();
        let jobs = schedule_industry_job_syncs(test.db.clone(), queue.clone())
            .await
            .unwrap();

        assert_eq!(jobs, 3);
        assert_eq!(queue.len(), 6);
    }
}
