use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::model::industry_job::SyncedIndustryJob;

pub struct IndustryJobRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> IndustryJobRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts or refreshes one industry job row from a sync pass.
    ///
    /// The blueprint column carries a unique constraint, so the caller must
    /// filter out batches that reference the same blueprint twice.
    pub async fn upsert(
        &self,
        owner_id: i32,
        job: &SyncedIndustryJob,
    ) -> Result<entity::industry_job::Model, DbErr> {
        let model = entity::industry_job::ActiveModel {
            job_id: ActiveValue::Set(job.job_id),
            owner_id: ActiveValue::Set(owner_id),
            blueprint_id: ActiveValue::Set(job.blueprint_id),
            activity: ActiveValue::Set(job.activity),
            installer_id: ActiveValue::Set(job.installer_id),
            location_id: ActiveValue::Set(job.location_id),
            runs: ActiveValue::Set(job.runs),
            start_date: ActiveValue::Set(job.start_date),
            end_date: ActiveValue::Set(job.end_date),
            status: ActiveValue::Set(job.status.clone()),
        };

        entity::prelude::IndustryJob::insert(model)
            .on_conflict(
                OnConflict::column(entity::industry_job::Column::JobId)
                    .update_columns([
                        entity::industry_job::Column::OwnerId,
                        entity::industry_job::Column::BlueprintId,
                        entity::industry_job::Column::Activity,
                        entity::industry_job::Column::InstallerId,
                        entity::industry_job::Column::LocationId,
                        entity::industry_job::Column::Runs,
                        entity::industry_job::Column::StartDate,
                        entity::industry_job::Column::EndDate,
                        entity::industry_job::Column::Status,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    pub async fn get_by_owner_id(
        &self,
        owner_id: i32,
    ) -> Result<Vec<entity::industry_job::Model>, DbErr> {
        entity::prelude::IndustryJob::find()
            .filter(entity::industry_job::Column::OwnerId.eq(owner_id))
            .all(self.db)
            .await
    }

    pub async fn get_by_owner_ids(
        &self,
        owner_ids: &[i32],
    ) -> Result<Vec<entity::industry_job::Model>, DbErr> {
        entity::prelude::IndustryJob::find()
            .filter(entity::industry_job::Column::OwnerId.is_in(owner_ids.iter().copied()))
            .all(self.db)
            .await
    }

    pub async fn get_by_blueprint_ids(
        &self,
        blueprint_ids: &[i64],
    ) -> Result<Vec<entity::industry_job::Model>, DbErr> {
        entity::prelude::IndustryJob::find()
            .filter(
                entity::industry_job::Column::BlueprintId
                    .is_in(blueprint_ids.iter().copied()),
            )
            .all(self.db)
            .await
    }

    /// Deletes the owner's jobs that a sync pass no longer saw.
    pub async fn delete_by_owner_except(
        &self,
        owner_id: i32,
        keep_job_ids: &[i64],
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::IndustryJob::delete_many()
            .filter(entity::industry_job::Column::OwnerId.eq(owner_id))
            .filter(
                entity::industry_job::Column::JobId.is_not_in(keep_job_ids.iter().copied()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
