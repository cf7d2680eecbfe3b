use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260115_000001_eve_corporation::EveCorporation, m20260115_000006_user_character::UserCharacter,
};

static IDX_OWNER_USER_CHARACTER_ID: &str = "idx-owner-user_character_id";
static IDX_OWNER_CORPORATION_ID: &str = "idx-owner-corporation_id";
static FK_OWNER_USER_CHARACTER_ID: &str = "fk-owner-user_character_id";
static FK_OWNER_CORPORATION_ID: &str = "fk-owner-corporation_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Owner::Table)
                    .if_not_exists()
                    .col(pk_auto(Owner::Id))
                    .col(integer(Owner::UserCharacterId))
                    .col(big_integer_null(Owner::CorporationId))
                    .col(boolean(Owner::IsActive))
                    .col(timestamp(Owner::CreatedAt))
                    .col(timestamp(Owner::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OWNER_USER_CHARACTER_ID)
                    .table(Owner::Table)
                    .col(Owner::UserCharacterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OWNER_CORPORATION_ID)
                    .table(Owner::Table)
                    .col(Owner::CorporationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OWNER_USER_CHARACTER_ID)
                    .from_tbl(Owner::Table)
                    .from_col(Owner::UserCharacterId)
                    .to_tbl(UserCharacter::Table)
                    .to_col(UserCharacter::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OWNER_CORPORATION_ID)
                    .from_tbl(Owner::Table)
                    .from_col(Owner::CorporationId)
                    .to_tbl(EveCorporation::Table)
                    .to_col(EveCorporation::CorporationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_OWNER_CORPORATION_ID)
                    .table(Owner::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_OWNER_USER_CHARACTER_ID)
                    .table(Owner::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_OWNER_CORPORATION_ID)
                    .table(Owner::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_OWNER_USER_CHARACTER_ID)
                    .table(Owner::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Owner::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Owner {
    Table,
    Id,
    UserCharacterId,
    CorporationId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
