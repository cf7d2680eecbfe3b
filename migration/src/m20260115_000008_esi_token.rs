use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260115_000006_user_character::UserCharacter;

static IDX_ESI_TOKEN_USER_CHARACTER_ID: &str = "idx-esi_token-user_character_id";
static FK_ESI_TOKEN_USER_CHARACTER_ID: &str = "fk-esi_token-user_character_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EsiToken::Table)
                    .if_not_exists()
                    .col(pk_auto(EsiToken::Id))
                    .col(integer(EsiToken::UserCharacterId))
                    .col(text(EsiToken::AccessToken))
                    .col(text_null(EsiToken::RefreshToken))
                    .col(text(EsiToken::Scopes))
                    .col(timestamp(EsiToken::ExpiresAt))
                    .col(timestamp(EsiToken::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ESI_TOKEN_USER_CHARACTER_ID)
                    .table(EsiToken::Table)
                    .col(EsiToken::UserCharacterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_ESI_TOKEN_USER_CHARACTER_ID)
                    .from_tbl(EsiToken::Table)
                    .from_col(EsiToken::UserCharacterId)
                    .to_tbl(UserCharacter::Table)
                    .to_col(UserCharacter::Id)
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
                    .name(FK_ESI_TOKEN_USER_CHARACTER_ID)
                    .table(EsiToken::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ESI_TOKEN_USER_CHARACTER_ID)
                    .table(EsiToken::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EsiToken::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum EsiToken {
    Table,
    Id,
    UserCharacterId,
    AccessToken,
    RefreshToken,
    Scopes,
    ExpiresAt,
    CreatedAt,
}
