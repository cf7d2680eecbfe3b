use migration::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::esi::model::TypeInfo;

pub struct EveTypeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EveTypeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn upsert(&self, info: &TypeInfo) -> Result<entity::eve_type::Model, DbErr> {
        let model = entity::eve_type::ActiveModel {
            type_id: ActiveValue::Set(info.type_id),
            name: ActiveValue::Set(info.name.clone()),
        };

        entity::prelude::EveType::insert(model)
            .on_conflict(
                OnConflict::column(entity::eve_type::Column::TypeId)
                    .update_columns([entity::eve_type::Column::Name])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    pub async fn get_by_type_id(
        &self,
        type_id: i64,
    ) -> Result<Option<entity::eve_type::Model>, DbErr> {
        entity::prelude::EveType::find_by_id(type_id).one(self.db).await
    }

    pub async fn get_by_type_ids(
        &self,
        type_ids: &[i64],
    ) -> Result<Vec<entity::eve_type::Model>, DbErr> {
        entity::prelude::EveType::find()
            .filter(entity::eve_type::Column::TypeId.is_in(type_ids.iter().copied()))
            .all(self.db)
            .await
    }
}
