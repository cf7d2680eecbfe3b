use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20260115_000002_eve_character::EveCharacter, m20260115_000005_user::User};

static IDX_USER_CHARACTER_USER_ID: &str = "idx-user_character-user_id";
static IDX_USER_CHARACTER_CHARACTER_ID: &str = "idx-user_character-character_id";
static FK_USER_CHARACTER_USER_ID: &str = "fk-user_character-user_id";
static FK_USER_CHARACTER_CHARACTER_ID: &str = "fk-user_character-character_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCharacter::Table)
                    .if_not_exists()
                    .col(pk_auto(UserCharacter::Id))
                    .col(integer(UserCharacter::UserId))
                    .col(big_integer(UserCharacter::CharacterId))
                    .col(string_uniq(UserCharacter::OwnerHash))
                    .col(boolean(UserCharacter::IsMain))
                    .col(timestamp(UserCharacter::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_USER_CHARACTER_USER_ID)
                    .table(UserCharacter::Table)
                    .col(UserCharacter::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_USER_CHARACTER_CHARACTER_ID)
                    .table(UserCharacter::Table)
                    .col(UserCharacter::CharacterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USER_CHARACTER_USER_ID)
                    .from_tbl(UserCharacter::Table)
                    .from_col(UserCharacter::UserId)
                    .to_tbl(User::Table)
                    .to_col(User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USER_CHARACTER_CHARACTER_ID)
                    .from_tbl(UserCharacter::Table)
                    .from_col(UserCharacter::CharacterId)
                    .to_tbl(EveCharacter::Table)
                    .to_col(EveCharacter::CharacterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_USER_CHARACTER_CHARACTER_ID)
                    .table(UserCharacter::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_USER_CHARACTER_USER_ID)
                    .table(UserCharacter::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_USER_CHARACTER_CHARACTER_ID)
                    .table(UserCharacter::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_USER_CHARACTER_USER_ID)
                    .table(UserCharacter::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserCharacter::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UserCharacter {
    Table,
    Id,
    UserId,
    CharacterId,
    OwnerHash,
    IsMain,
    CreatedAt,
}
