use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    IntoActiveModel, QueryFilter,
};

pub struct OwnerRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OwnerRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Registers a corporation as a blueprint owner.
    ///
    /// Each corporation has at most one owner row; re-registering replaces
    /// the syncing character and reactivates the owner.
    pub async fn upsert_corporate(
        &self,
        user_character_id: i32,
        corporation_id: i64,
    ) -> Result<entity::owner::Model, DbErr> {
        let owner = entity::owner::ActiveModel {
            user_character_id: ActiveValue::Set(user_character_id),
            corporation_id: ActiveValue::Set(Some(corporation_id)),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        entity::prelude::Owner::insert(owner)
            .on_conflict(
                OnConflict::column(entity::owner::Column::CorporationId)
                    .update_columns([
                        entity::owner::Column::UserCharacterId,
                        entity::owner::Column::IsActive,
                        entity::owner::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    /// Registers a linked character as a personal blueprint owner.
    ///
    /// One personal owner per linked character; re-registering reactivates it.
    /// The corporation unique index can't arbitrate here (personal owners all
    /// have a null corporation), so this is a lookup-then-write.
    pub async fn upsert_personal(
        &self,
        user_character_id: i32,
    ) -> Result<entity::owner::Model, DbErr> {
        let existing = entity::prelude::Owner::find()
            .filter(entity::owner::Column::UserCharacterId.eq(user_character_id))
            .filter(entity::owner::Column::CorporationId.is_null())
            .one(self.db)
            .await?;

        if let Some(existing) = existing {
            let mut owner = existing.into_active_model();
            owner.is_active = ActiveValue::Set(true);
            owner.updated_at = ActiveValue::Set(Utc::now().naive_utc());
            return owner.update(self.db).await;
        }

        let owner = entity::owner::ActiveModel {
            user_character_id: ActiveValue::Set(user_character_id),
            corporation_id: ActiveValue::Set(None),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        owner.insert(self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::owner::Model>, DbErr> {
        entity::prelude::Owner::find_by_id(id).one(self.db).await
    }

    pub async fn get_all(&self) -> Result<Vec<entity::owner::Model>, DbErr> {
        entity::prelude::Owner::find().all(self.db).await
    }

    /// Owners participating in scheduled syncs.
    pub async fn get_active(&self) -> Result<Vec<entity::owner::Model>, DbErr> {
        entity::prelude::Owner::find()
            .filter(entity::owner::Column::IsActive.eq(true))
            .all(self.db)
            .await
    }

    /// Owners registered through any of the user's linked characters.
    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Vec<entity::owner::Model>, DbErr> {
        entity::prelude::Owner::find()
            .inner_join(entity::prelude::UserCharacter)
            .filter(entity::user_character::Column::UserId.eq(user_id))
            .all(self.db)
            .await
    }

    pub async fn set_active(
        &self,
        id: i32,
        is_active: bool,
    ) -> Result<entity::owner::Model, DbErr> {
        let owner = entity::owner::ActiveModel {
            id: ActiveValue::Unchanged(id),
            is_active: ActiveValue::Set(is_active),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        owner.update(self.db).await
    }

    /// Deletes an owner; blueprints, jobs, and requests cascade with it.
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Owner::delete_by_id(id).exec(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Schema};

    use crate::data::owner::OwnerRepository;
    use crate::util::test::setup::{test_setup, test_setup_create_user_with_character};

    async fn setup() -> Result<DatabaseConnection, DbErr> {
        let test = test_setup().await;

        let db = test.db;
        let schema = Schema::new(DbBackend::Sqlite);

        let stmts = vec![
            schema.create_table_from_entity(entity::prelude::EveCorporation),
            schema.create_table_from_entity(entity::prelude::EveCharacter),
            schema.create_table_from_entity(entity::prelude::User),
            schema.create_table_from_entity(entity::prelude::UserCharacter),
            schema.create_table_from_entity(entity::prelude::Owner),
        ];

        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        Ok(db)
    }

    /// Re-registering a corporation should replace the syncing character
    #[tokio::test]
    async fn upsert_corporate_replaces_syncing_character() -> Result<(), DbErr> {
        let db = setup().await?;

        let (_, first) = test_setup_create_user_with_character(&db, "User A", 1001, 2001).await?;
        let (_, second) = test_setup_create_user_with_character(&db, "User B", 1002, 2001).await?;

        let repo = OwnerRepository::new(&db);
        let original = repo.upsert_corporate(first.id, 2001).await?;
        let replaced = repo.upsert_corporate(second.id, 2001).await?;

        assert_eq!(original.id, replaced.id);
        assert_eq!(replaced.user_character_id, second.id);
        assert_eq!(repo.get_all().await?.len(), 1);

        Ok(())
    }

    /// Re-registering a personal owner should reactivate the existing row
    #[tokio::test]
    async fn upsert_personal_reactivates_existing_owner() -> Result<(), DbErr> {
        let db = setup().await?;

        let (_, user_character) =
            test_setup_create_user_with_character(&db, "User A", 1001, 2001).await?;

        let repo = OwnerRepository::new(&db);
        let owner = repo.upsert_personal(user_character.id).await?;
        repo.set_active(owner.id, false).await?;

        let reactivated = repo.upsert_personal(user_character.id).await?;

        assert_eq!(reactivated.id, owner.id);
        assert!(reactivated.is_active);
        assert_eq!(repo.get_active().await?.len(), 1);

        Ok(())
    }

    /// A personal owner and a corporate owner can share a linked character
    #[tokio::test]
    async fn personal_and_corporate_owners_coexist() -> Result<(), DbErr> {
        let db = setup().await?;

        let (user, user_character) =
            test_setup_create_user_with_character(&db, "User A", 1001, 2001).await?;

        let repo = OwnerRepository::new(&db);
        repo.upsert_corporate(user_character.id, 2001).await?;
        repo.upsert_personal(user_character.id).await?;

        let owners = repo.get_by_user_id(user.id).await?;
        assert_eq!(owners.len(), 2);

        Ok(())
    }
}
