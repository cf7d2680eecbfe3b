use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260115_000003_eve_type::EveType, m20260115_000004_eve_solar_system::EveSolarSystem,
};

static IDX_LOCATION_PARENT_ID: &str = "idx-location-parent_id";
static IDX_LOCATION_EVE_SOLAR_SYSTEM_ID: &str = "idx-location-eve_solar_system_id";
static IDX_LOCATION_EVE_TYPE_ID: &str = "idx-location-eve_type_id";
static FK_LOCATION_PARENT_ID: &str = "fk-location-parent_id";
static FK_LOCATION_EVE_SOLAR_SYSTEM_ID: &str = "fk-location-eve_solar_system_id";
static FK_LOCATION_EVE_TYPE_ID: &str = "fk-location-eve_type_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Location::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(Location::Name))
                    .col(big_integer_null(Location::ParentId))
                    .col(big_integer_null(Location::EveSolarSystemId))
                    .col(big_integer_null(Location::EveTypeId))
                    .col(big_integer_null(Location::OwnerCorporationId))
                    .col(timestamp(Location::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LOCATION_PARENT_ID)
                    .table(Location::Table)
                    .col(Location::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LOCATION_EVE_SOLAR_SYSTEM_ID)
                    .table(Location::Table)
                    .col(Location::EveSolarSystemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LOCATION_EVE_TYPE_ID)
                    .table(Location::Table)
                    .col(Location::EveTypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_LOCATION_PARENT_ID)
                    .from_tbl(Location::Table)
                    .from_col(Location::ParentId)
                    .to_tbl(Location::Table)
                    .to_col(Location::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_LOCATION_EVE_SOLAR_SYSTEM_ID)
                    .from_tbl(Location::Table)
                    .from_col(Location::EveSolarSystemId)
                    .to_tbl(EveSolarSystem::Table)
                    .to_col(EveSolarSystem::SolarSystemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_LOCATION_EVE_TYPE_ID)
                    .from_tbl(Location::Table)
                    .from_col(Location::EveTypeId)
                    .to_tbl(EveType::Table)
                    .to_col(EveType::TypeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_LOCATION_EVE_TYPE_ID)
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_LOCATION_EVE_SOLAR_SYSTEM_ID)
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_LOCATION_PARENT_ID)
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_LOCATION_EVE_TYPE_ID)
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_LOCATION_EVE_SOLAR_SYSTEM_ID)
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_LOCATION_PARENT_ID)
                    .table(Location::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Location {
    Table,
    Id,
    Name,
    ParentId,
    EveSolarSystemId,
    EveTypeId,
    OwnerCorporationId,
    UpdatedAt,
}
