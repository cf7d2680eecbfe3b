use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::model::blueprint::SyncedBlueprint;

pub struct BlueprintRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BlueprintRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts or refreshes one blueprint row from a sync pass.
    ///
    /// The conflict target is the remote item ID, so a blueprint moving
    /// between hangars or changing research levels updates in place.
    pub async fn upsert(
        &self,
        owner_id: i32,
        blueprint: &SyncedBlueprint,
    ) -> Result<entity::blueprint::Model, DbErr> {
        let model = entity::blueprint::ActiveModel {
            item_id: ActiveValue::Set(blueprint.item_id),
            owner_id: ActiveValue::Set(owner_id),
            eve_type_id: ActiveValue::Set(blueprint.eve_type_id),
            location_id: ActiveValue::Set(blueprint.location_id),
            location_flag: ActiveValue::Set(blueprint.location_flag.clone()),
            quantity: ActiveValue::Set(blueprint.quantity),
            runs: ActiveValue::Set(blueprint.runs),
            material_efficiency: ActiveValue::Set(blueprint.material_efficiency),
            time_efficiency: ActiveValue::Set(blueprint.time_efficiency),
        };

        entity::prelude::Blueprint::insert(model)
            .on_conflict(
                OnConflict::column(entity::blueprint::Column::ItemId)
                    .update_columns([
                        entity::blueprint::Column::OwnerId,
                        entity::blueprint::Column::EveTypeId,
                        entity::blueprint::Column::LocationId,
                        entity::blueprint::Column::LocationFlag,
                        entity::blueprint::Column::Quantity,
                        entity::blueprint::Column::Runs,
                        entity::blueprint::Column::MaterialEfficiency,
                        entity::blueprint::Column::TimeEfficiency,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    pub async fn get_by_item_id(
        &self,
        item_id: i64,
    ) -> Result<Option<entity::blueprint::Model>, DbErr> {
        entity::prelude::Blueprint::find_by_id(item_id).one(self.db).await
    }

    pub async fn get_by_item_ids(
        &self,
        item_ids: &[i64],
    ) -> Result<Vec<entity::blueprint::Model>, DbErr> {
        entity::prelude::Blueprint::find()
            .filter(entity::blueprint::Column::ItemId.is_in(item_ids.iter().copied()))
            .all(self.db)
            .await
    }

    pub async fn get_by_owner_id(
        &self,
        owner_id: i32,
    ) -> Result<Vec<entity::blueprint::Model>, DbErr> {
        entity::prelude::Blueprint::find()
            .filter(entity::blueprint::Column::OwnerId.eq(owner_id))
            .all(self.db)
            .await
    }

    pub async fn get_by_owner_ids(
        &self,
        owner_ids: &[i32],
    ) -> Result<Vec<entity::blueprint::Model>, DbErr> {
        entity::prelude::Blueprint::find()
            .filter(entity::blueprint::Column::OwnerId.is_in(owner_ids.iter().copied()))
            .all(self.db)
            .await
    }

    pub async fn count_by_owner_id(&self, owner_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Blueprint::find()
            .filter(entity::blueprint::Column::OwnerId.eq(owner_id))
            .count(self.db)
            .await
    }

    /// Deletes the owner's blueprints that a sync pass no longer saw.
    ///
    /// With an empty keep list this clears the owner entirely, which is the
    /// correct reading of an empty remote listing.
    pub async fn delete_by_owner_except(
        &self,
        owner_id: i32,
        keep_item_ids: &[i64],
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::Blueprint::delete_many()
            .filter(entity::blueprint::Column::OwnerId.eq(owner_id))
            .filter(
                entity::blueprint::Column::ItemId.is_not_in(keep_item_ids.iter().copied()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
