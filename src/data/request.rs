use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use entity::sea_orm_active_enums::RequestStatus;

pub struct RequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RequestRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Opens a new request against a blueprint.
    pub async fn create(
        &self,
        blueprint_id: i64,
        requesting_user_id: i32,
        runs: Option<i32>,
    ) -> Result<entity::request::Model, DbErr> {
        let request = entity::request::ActiveModel {
            blueprint_id: ActiveValue::Set(blueprint_id),
            requesting_user_id: ActiveValue::Set(requesting_user_id),
            fulfilling_user_id: ActiveValue::Set(None),
            runs: ActiveValue::Set(runs),
            status: ActiveValue::Set(RequestStatus::Open),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            closed_at: ActiveValue::Set(None),
            ..Default::default()
        };

        request.insert(self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::request::Model>, DbErr> {
        entity::prelude::Request::find_by_id(id).one(self.db).await
    }

    pub async fn get_by_requesting_user_id(
        &self,
        user_id: i32,
    ) -> Result<Vec<entity::request::Model>, DbErr> {
        entity::prelude::Request::find()
            .filter(entity::request::Column::RequestingUserId.eq(user_id))
            .all(self.db)
            .await
    }

    /// Open requests against blueprints held by any of the given owners.
    pub async fn get_open_for_owners(
        &self,
        owner_ids: &[i32],
    ) -> Result<Vec<entity::request::Model>, DbErr> {
        entity::prelude::Request::find()
            .inner_join(entity::prelude::Blueprint)
            .filter(entity::blueprint::Column::OwnerId.is_in(owner_ids.iter().copied()))
            .filter(entity::request::Column::Status.eq(RequestStatus::Open))
            .filter(entity::request::Column::ClosedAt.is_null())
            .all(self.db)
            .await
    }

    /// Requests the given user is actively fulfilling against the given owners.
    pub async fn get_in_progress_for_user(
        &self,
        owner_ids: &[i32],
        fulfilling_user_id: i32,
    ) -> Result<Vec<entity::request::Model>, DbErr> {
        entity::prelude::Request::find()
            .inner_join(entity::prelude::Blueprint)
            .filter(entity::blueprint::Column::OwnerId.is_in(owner_ids.iter().copied()))
            .filter(entity::request::Column::Status.eq(RequestStatus::InProgress))
            .filter(entity::request::Column::FulfillingUserId.eq(fulfilling_user_id))
            .all(self.db)
            .await
    }

    /// Applies one state transition.
    ///
    /// The fulfilling user and closing timestamp are written as given, so the
    /// caller owns the pairing rules between them and the status.
    pub async fn update_status(
        &self,
        id: i32,
        status: RequestStatus,
        fulfilling_user_id: Option<i32>,
        closed_at: Option<NaiveDateTime>,
    ) -> Result<entity::request::Model, DbErr> {
        let request = entity::request::ActiveModel {
            id: ActiveValue::Unchanged(id),
            status: ActiveValue::Set(status),
            fulfilling_user_id: ActiveValue::Set(fulfilling_user_id),
            closed_at: ActiveValue::Set(closed_at),
            ..Default::default()
        };

        request.update(self.db).await
    }
}
