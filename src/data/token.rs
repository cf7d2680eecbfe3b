use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    QueryFilter,
};

use crate::model::token::NewEsiToken;

pub struct EsiTokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EsiTokenRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores a freshly issued token for a linked character.
    pub async fn create(
        &self,
        user_character_id: i32,
        token: &NewEsiToken,
    ) -> Result<entity::esi_token::Model, DbErr> {
        let token = entity::esi_token::ActiveModel {
            user_character_id: ActiveValue::Set(user_character_id),
            access_token: ActiveValue::Set(token.access_token.clone()),
            refresh_token: ActiveValue::Set(token.refresh_token.clone()),
            scopes: ActiveValue::Set(token.scopes.clone()),
            expires_at: ActiveValue::Set(token.expires_at),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        token.insert(self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::esi_token::Model>, DbErr> {
        entity::prelude::EsiToken::find_by_id(id).one(self.db).await
    }

    pub async fn get_by_user_character_id(
        &self,
        user_character_id: i32,
    ) -> Result<Vec<entity::esi_token::Model>, DbErr> {
        entity::prelude::EsiToken::find()
            .filter(entity::esi_token::Column::UserCharacterId.eq(user_character_id))
            .all(self.db)
            .await
    }

    /// Writes back the result of an SSO refresh.
    ///
    /// `refresh_token` is only overwritten when SSO rotated it.
    pub async fn update_after_refresh(
        &self,
        id: i32,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: NaiveDateTime,
    ) -> Result<entity::esi_token::Model, DbErr> {
        let mut token = entity::esi_token::ActiveModel {
            id: ActiveValue::Unchanged(id),
            access_token: ActiveValue::Set(access_token.to_string()),
            expires_at: ActiveValue::Set(expires_at),
            ..Default::default()
        };
        if let Some(refresh_token) = refresh_token {
            token.refresh_token = ActiveValue::Set(Some(refresh_token.to_string()));
        }

        token.update(self.db).await
    }

    /// Removes a token SSO refused to refresh, it will never work again.
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::EsiToken::delete_by_id(id).exec(self.db).await
    }
}
