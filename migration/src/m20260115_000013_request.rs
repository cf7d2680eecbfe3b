use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20260115_000005_user::User, m20260115_000011_blueprint::Blueprint};

static IDX_REQUEST_BLUEPRINT_ID: &str = "idx-request-blueprint_id";
static IDX_REQUEST_REQUESTING_USER_ID: &str = "idx-request-requesting_user_id";
static IDX_REQUEST_STATUS: &str = "idx-request-status";
static FK_REQUEST_BLUEPRINT_ID: &str = "fk-request-blueprint_id";
static FK_REQUEST_REQUESTING_USER_ID: &str = "fk-request-requesting_user_id";
static FK_REQUEST_FULFILLING_USER_ID: &str = "fk-request-fulfilling_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Request::Table)
                    .if_not_exists()
                    .col(pk_auto(Request::Id))
                    .col(big_integer(Request::BlueprintId))
                    .col(integer(Request::RequestingUserId))
                    .col(integer_null(Request::FulfillingUserId))
                    .col(integer_null(Request::Runs))
                    .col(string_len(Request::Status, 2))
                    .col(timestamp(Request::CreatedAt))
                    .col(timestamp_null(Request::ClosedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REQUEST_BLUEPRINT_ID)
                    .table(Request::Table)
                    .col(Request::BlueprintId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REQUEST_REQUESTING_USER_ID)
                    .table(Request::Table)
                    .col(Request::RequestingUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REQUEST_STATUS)
                    .table(Request::Table)
                    .col(Request::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REQUEST_BLUEPRINT_ID)
                    .from_tbl(Request::Table)
                    .from_col(Request::BlueprintId)
                    .to_tbl(Blueprint::Table)
                    .to_col(Blueprint::ItemId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REQUEST_REQUESTING_USER_ID)
                    .from_tbl(Request::Table)
                    .from_col(Request::RequestingUserId)
                    .to_tbl(User::Table)
                    .to_col(User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REQUEST_FULFILLING_USER_ID)
                    .from_tbl(Request::Table)
                    .from_col(Request::FulfillingUserId)
                    .to_tbl(User::Table)
                    .to_col(User::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REQUEST_FULFILLING_USER_ID)
                    .table(Request::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REQUEST_REQUESTING_USER_ID)
                    .table(Request::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REQUEST_BLUEPRINT_ID)
                    .table(Request::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_REQUEST_STATUS)
                    .table(Request::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_REQUEST_REQUESTING_USER_ID)
                    .table(Request::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_REQUEST_BLUEPRINT_ID)
                    .table(Request::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Request::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Request {
    Table,
    Id,
    BlueprintId,
    RequestingUserId,
    FulfillingUserId,
    Runs,
    Status,
    CreatedAt,
    ClosedAt,
}
