use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20260115_000009_owner::Owner, m20260115_000011_blueprint::Blueprint};

static IDX_INDUSTRY_JOB_OWNER_ID: &str = "idx-industry_job-owner_id";
static FK_INDUSTRY_JOB_OWNER_ID: &str = "fk-industry_job-owner_id";
static FK_INDUSTRY_JOB_BLUEPRINT_ID: &str = "fk-industry_job-blueprint_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IndustryJob::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IndustryJob::JobId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(integer(IndustryJob::OwnerId))
                    .col(big_integer_uniq(IndustryJob::BlueprintId))
                    .col(integer(IndustryJob::Activity))
                    .col(big_integer(IndustryJob::InstallerId))
                    .col(big_integer(IndustryJob::LocationId))
                    .col(integer(IndustryJob::Runs))
                    .col(timestamp(IndustryJob::StartDate))
                    .col(timestamp(IndustryJob::EndDate))
                    .col(string_len(IndustryJob::Status, 10))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_INDUSTRY_JOB_OWNER_ID)
                    .table(IndustryJob::Table)
                    .col(IndustryJob::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_INDUSTRY_JOB_OWNER_ID)
                    .from_tbl(IndustryJob::Table)
                    .from_col(IndustryJob::OwnerId)
                    .to_tbl(Owner::Table)
                    .to_col(Owner::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_INDUSTRY_JOB_BLUEPRINT_ID)
                    .from_tbl(IndustryJob::Table)
                    .from_col(IndustryJob::BlueprintId)
                    .to_tbl(Blueprint::Table)
                    .to_col(Blueprint::ItemId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_INDUSTRY_JOB_BLUEPRINT_ID)
                    .table(IndustryJob::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_INDUSTRY_JOB_OWNER_ID)
                    .table(IndustryJob::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_INDUSTRY_JOB_OWNER_ID)
                    .table(IndustryJob::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(IndustryJob::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum IndustryJob {
    Table,
    JobId,
    OwnerId,
    BlueprintId,
    Activity,
    InstallerId,
    LocationId,
    Runs,
    StartDate,
    EndDate,
    Status,
}
