use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260115_000003_eve_type::EveType, m20260115_000009_owner::Owner,
    m20260115_000010_location::Location,
};

static IDX_BLUEPRINT_OWNER_ID: &str = "idx-blueprint-owner_id";
static IDX_BLUEPRINT_EVE_TYPE_ID: &str = "idx-blueprint-eve_type_id";
static IDX_BLUEPRINT_LOCATION_ID: &str = "idx-blueprint-location_id";
static FK_BLUEPRINT_OWNER_ID: &str = "fk-blueprint-owner_id";
static FK_BLUEPRINT_EVE_TYPE_ID: &str = "fk-blueprint-eve_type_id";
static FK_BLUEPRINT_LOCATION_ID: &str = "fk-blueprint-location_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blueprint::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blueprint::ItemId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(integer(Blueprint::OwnerId))
                    .col(big_integer(Blueprint::EveTypeId))
                    .col(big_integer(Blueprint::LocationId))
                    .col(string_len(Blueprint::LocationFlag, 36))
                    .col(integer(Blueprint::Quantity))
                    .col(integer_null(Blueprint::Runs))
                    .col(integer(Blueprint::MaterialEfficiency))
                    .col(integer(Blueprint::TimeEfficiency))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_BLUEPRINT_OWNER_ID)
                    .table(Blueprint::Table)
                    .col(Blueprint::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_BLUEPRINT_EVE_TYPE_ID)
                    .table(Blueprint::Table)
                    .col(Blueprint::EveTypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_BLUEPRINT_LOCATION_ID)
                    .table(Blueprint::Table)
                    .col(Blueprint::LocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BLUEPRINT_OWNER_ID)
                    .from_tbl(Blueprint::Table)
                    .from_col(Blueprint::OwnerId)
                    .to_tbl(Owner::Table)
                    .to_col(Owner::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BLUEPRINT_EVE_TYPE_ID)
                    .from_tbl(Blueprint::Table)
                    .from_col(Blueprint::EveTypeId)
                    .to_tbl(EveType::Table)
                    .to_col(EveType::TypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BLUEPRINT_LOCATION_ID)
                    .from_tbl(Blueprint::Table)
                    .from_col(Blueprint::LocationId)
                    .to_tbl(Location::Table)
                    .to_col(Location::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_BLUEPRINT_LOCATION_ID)
                    .table(Blueprint::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_BLUEPRINT_EVE_TYPE_ID)
                    .table(Blueprint::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_BLUEPRINT_OWNER_ID)
                    .table(Blueprint::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_BLUEPRINT_LOCATION_ID)
                    .table(Blueprint::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_BLUEPRINT_EVE_TYPE_ID)
                    .table(Blueprint::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_BLUEPRINT_OWNER_ID)
                    .table(Blueprint::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Blueprint::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Blueprint {
    Table,
    ItemId,
    OwnerId,
    EveTypeId,
    LocationId,
    LocationFlag,
    Quantity,
    Runs,
    MaterialEfficiency,
    TimeEfficiency,
}
