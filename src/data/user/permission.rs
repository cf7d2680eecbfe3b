use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};

pub struct PermissionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PermissionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Grants a permission to a user.
    ///
    /// Fails with a unique constraint violation when the grant already exists.
    pub async fn grant(
        &self,
        user_id: i32,
        permission: &str,
    ) -> Result<entity::user_permission::Model, DbErr> {
        let grant = entity::user_permission::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            permission: ActiveValue::Set(permission.to_string()),
            ..Default::default()
        };

        grant.insert(self.db).await
    }

    pub async fn has_permission(&self, user_id: i32, permission: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::UserPermission::find()
            .filter(entity::user_permission::Column::UserId.eq(user_id))
            .filter(entity::user_permission::Column::Permission.eq(permission))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }
}
