use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QuerySelect,
};

pub struct UserCharacterRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserCharacterRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Links an EVE character to a user.
    ///
    /// `owner_hash` is CCP's character ownership hash: it changes when the
    /// character is transferred to another account, which is how stale links
    /// get detected by the hosting application.
    pub async fn create(
        &self,
        user_id: i32,
        character_id: i64,
        owner_hash: &str,
        is_main: bool,
    ) -> Result<entity::user_character::Model, DbErr> {
        let user_character = entity::user_character::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            character_id: ActiveValue::Set(character_id),
            owner_hash: ActiveValue::Set(owner_hash.to_string()),
            is_main: ActiveValue::Set(is_main),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        user_character.insert(self.db).await
    }

    pub async fn get_by_id(
        &self,
        id: i32,
    ) -> Result<Option<entity::user_character::Model>, DbErr> {
        entity::prelude::UserCharacter::find_by_id(id).one(self.db).await
    }

    pub async fn get_by_ids(
        &self,
        ids: &[i32],
    ) -> Result<Vec<entity::user_character::Model>, DbErr> {
        entity::prelude::UserCharacter::find()
            .filter(entity::user_character::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
    }

    pub async fn get_by_user_id(
        &self,
        user_id: i32,
    ) -> Result<Vec<entity::user_character::Model>, DbErr> {
        entity::prelude::UserCharacter::find()
            .filter(entity::user_character::Column::UserId.eq(user_id))
            .all(self.db)
            .await
    }

    /// The ownership row linking `user_id` to `character_id`, if any.
    pub async fn get_ownership(
        &self,
        user_id: i32,
        character_id: i64,
    ) -> Result<Option<entity::user_character::Model>, DbErr> {
        entity::prelude::UserCharacter::find()
            .filter(entity::user_character::Column::UserId.eq(user_id))
            .filter(entity::user_character::Column::CharacterId.eq(character_id))
            .one(self.db)
            .await
    }

    /// EVE character IDs of every character the user has linked.
    pub async fn get_character_ids(&self, user_id: i32) -> Result<Vec<i64>, DbErr> {
        entity::prelude::UserCharacter::find()
            .select_only()
            .column(entity::user_character::Column::CharacterId)
            .filter(entity::user_character::Column::UserId.eq(user_id))
            .into_tuple::<i64>()
            .all(self.db)
            .await
    }
}
