use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
};

use crate::esi::model::CharacterInfo;

pub struct CharacterRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CharacterRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts or refreshes a character from its ESI representation.
    ///
    /// The corporation row must exist first, `corporation_id` is a foreign key.
    pub async fn upsert(
        &self,
        character_id: i64,
        character: &CharacterInfo,
    ) -> Result<entity::eve_character::Model, DbErr> {
        let model = entity::eve_character::ActiveModel {
            character_id: ActiveValue::Set(character_id),
            name: ActiveValue::Set(character.name.clone()),
            corporation_id: ActiveValue::Set(character.corporation_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        entity::prelude::EveCharacter::insert(model)
            .on_conflict(
                OnConflict::column(entity::eve_character::Column::CharacterId)
                    .update_columns([
                        entity::eve_character::Column::Name,
                        entity::eve_character::Column::CorporationId,
                        entity::eve_character::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    pub async fn get_by_character_id(
        &self,
        character_id: i64,
    ) -> Result<Option<entity::eve_character::Model>, DbErr> {
        entity::prelude::EveCharacter::find_by_id(character_id)
            .one(self.db)
            .await
    }

    pub async fn get_by_character_ids(
        &self,
        character_ids: &[i64],
    ) -> Result<Vec<entity::eve_character::Model>, DbErr> {
        entity::prelude::EveCharacter::find()
            .filter(
                entity::eve_character::Column::CharacterId.is_in(character_ids.iter().copied()),
            )
            .all(self.db)
            .await
    }

    /// Corporation IDs of the given characters, deduplicated.
    pub async fn get_corporation_ids(&self, character_ids: &[i64]) -> Result<Vec<i64>, DbErr> {
        entity::prelude::EveCharacter::find()
            .select_only()
            .column(entity::eve_character::Column::CorporationId)
            .distinct()
            .filter(
                entity::eve_character::Column::CharacterId.is_in(character_ids.iter().copied()),
            )
            .into_tuple::<i64>()
            .all(self.db)
            .await
    }
}
