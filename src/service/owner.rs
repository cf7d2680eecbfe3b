//! Owner registration and management.
//!
//! An owner is registered by handing in a character and a freshly issued
//! SSO token: the corporation variant reads corporation endpoints with the
//! character's roles, the personal variant reads the character's own
//! hangars. Registration validates scopes up front so a sync cycle never
//! discovers a useless token hours later, and ends by enqueueing the three
//! initial sync jobs so a new owner's data shows up without waiting for
//! the next scheduled pass.

use sea_orm::DatabaseConnection;

use crate::data::blueprint::BlueprintRepository;
use crate::data::owner::OwnerRepository;
use crate::data::token::EsiTokenRepository;
use crate::data::user::user_character::UserCharacterRepository;
use crate::error::{auth::AuthError, token::TokenError, Error};
use crate::esi::EsiClient;
use crate::model::owner::OwnerSummary;
use crate::model::permission::{ADD_CORPORATE_BLUEPRINT_OWNER, ADD_PERSONAL_BLUEPRINT_OWNER};
use crate::model::token::NewEsiToken;
use crate::model::worker::WorkerJob;
use crate::service::access::AccessService;
use crate::service::registry::RegistryService;
use crate::util::eve::{CORPORATE_OWNER_SCOPES, PERSONAL_OWNER_SCOPES};
use crate::worker::queue::WorkerQueue;

pub struct OwnerService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
}

impl<'a> OwnerService<'a> {
    pub fn new(db: &'a DatabaseConnection, esi_client: &'a EsiClient) -> Self {
        Self { db, esi_client }
    }

    /// Registers the character's corporation as a blueprint owner.
    ///
    /// # Arguments
    /// - `user_id`: The registering user, must own `character_id`
    /// - `character_id`: The character whose corporation is registered and
    ///   whose token future syncs authenticate with
    /// - `token`: A token from the caller's SSO flow, must carry the
    ///   corporate scope set
    /// - `queue`: Receives the owner's initial sync jobs
    ///
    /// # Returns
    /// The owner row; re-registering an already known corporation swaps the
    /// syncing character and reactivates the owner.
    pub async fn register_corporate_owner(
        &self,
        user_id: i32,
        character_id: i64,
        token: NewEsiToken,
        queue: &WorkerQueue,
    ) -> Result<entity::owner::Model, Error> {
        AccessService::new(self.db)
            .require_permission(user_id, ADD_CORPORATE_BLUEPRINT_OWNER)
            .await?;

        let ownership = self.require_ownership(user_id, character_id).await?;
        if !token.has_scopes(&CORPORATE_OWNER_SCOPES) {
            return Err(TokenError::InsufficientPermission { character_id }.into());
        }

        // Fresh membership lookup: the corporation being registered is
        // whatever the character is in right now, not what we last stored
        let character = RegistryService::new(self.db, self.esi_client)
            .refresh_character(character_id)
            .await?;

        EsiTokenRepository::new(self.db)
            .create(ownership.id, &token)
            .await?;
        let owner = OwnerRepository::new(self.db)
            .upsert_corporate(ownership.id, character.corporation_id)
            .await?;

        tracing::info!(
            "Registered corporation {} as owner {} via character {}",
            character.corporation_id,
            owner.id,
            character_id
        );
        self.enqueue_initial_syncs(&owner, queue);

        Ok(owner)
    }

    /// Registers one of the user's characters as a personal blueprint owner.
    ///
    /// Same flow as the corporate variant with the personal scope set; the
    /// owner tracks the character's own hangars instead of a corporation.
    pub async fn register_personal_owner(
        &self,
        user_id: i32,
        character_id: i64,
        token: NewEsiToken,
        queue: &WorkerQueue,
    ) -> Result<entity::owner::Model, Error> {
        AccessService::new(self.db)
            .require_permission(user_id, ADD_PERSONAL_BLUEPRINT_OWNER)
            .await?;

        let ownership = self.require_ownership(user_id, character_id).await?;
        if !token.has_scopes(&PERSONAL_OWNER_SCOPES) {
            return Err(TokenError::InsufficientPermission { character_id }.into());
        }

        // Membership still matters: personal owners are visible through
        // their character's corporation
        RegistryService::new(self.db, self.esi_client)
            .refresh_character(character_id)
            .await?;

        EsiTokenRepository::new(self.db)
            .create(ownership.id, &token)
            .await?;
        let owner = OwnerRepository::new(self.db)
            .upsert_personal(ownership.id)
            .await?;

        tracing::info!(
            "Registered character {} as personal owner {}",
            character_id,
            owner.id
        );
        self.enqueue_initial_syncs(&owner, queue);

        Ok(owner)
    }

    /// Owner management listing for one user's registered owners.
    pub async fn owners_for_user(&self, user_id: i32) -> Result<Vec<OwnerSummary>, Error> {
        let owners = OwnerRepository::new(self.db).get_by_user_id(user_id).await?;
        let names = AccessService::new(self.db).owner_display_names(&owners).await?;

        let blueprint_repository = BlueprintRepository::new(self.db);
        let mut summaries = Vec::with_capacity(owners.len());
        for owner in owners {
            let blueprint_count = blueprint_repository.count_by_owner_id(owner.id).await?;
            summaries.push(OwnerSummary {
                id: owner.id,
                name: names
                    .get(&owner.id)
                    .cloned()
                    .unwrap_or_else(|| format!("Owner #{}", owner.id)),
                is_corporate: owner.is_corporate(),
                is_active: owner.is_active,
                blueprint_count,
            });
        }

        Ok(summaries)
    }

    /// Pauses or resumes an owner's scheduled syncs.
    pub async fn set_owner_active(
        &self,
        user_id: i32,
        owner_id: i32,
        is_active: bool,
    ) -> Result<entity::owner::Model, Error> {
        self.require_owner_of(user_id, owner_id).await?;

        Ok(OwnerRepository::new(self.db)
            .set_active(owner_id, is_active)
            .await?)
    }

    /// Deletes an owner along with its blueprints, jobs, and requests.
    pub async fn remove_owner(&self, user_id: i32, owner_id: i32) -> Result<(), Error> {
        self.require_owner_of(user_id, owner_id).await?;

        OwnerRepository::new(self.db).delete(owner_id).await?;
        tracing::info!("Removed owner {} and its synced data", owner_id);

        Ok(())
    }

    fn enqueue_initial_syncs(&self, owner: &entity::owner::Model, queue: &WorkerQueue) {
        queue.push(WorkerJob::SyncBlueprints { owner_id: owner.id });
        queue.push(WorkerJob::SyncIndustryJobs { owner_id: owner.id });
        queue.push(WorkerJob::SyncLocations { owner_id: owner.id });
    }

    async fn require_ownership(
        &self,
        user_id: i32,
        character_id: i64,
    ) -> Result<entity::user_character::Model, Error> {
        UserCharacterRepository::new(self.db)
            .get_ownership(user_id, character_id)
            .await?
            .ok_or_else(|| {
                AuthError::CharacterNotOwned {
                    user_id,
                    character_id,
                }
                .into()
            })
    }

    async fn require_owner_of(&self, user_id: i32, owner_id: i32) -> Result<(), Error> {
        let owner = OwnerRepository::new(self.db)
            .get_by_id(owner_id)
            .await?
            .ok_or(Error::OwnerNotFound(owner_id))?;

        let link = UserCharacterRepository::new(self.db)
            .get_by_id(owner.user_character_id)
            .await?
            .ok_or(Error::OwnerNotFound(owner_id))?;

        if link.user_id != user_id {
            return Err(AuthError::CharacterNotOwned {
                user_id,
                character_id: link.character_id,
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, DbBackend, DbErr, Schema};
    use serde_json::json;

    use crate::data::owner::OwnerRepository;
    use crate::data::token::EsiTokenRepository;
    use crate::data::user::permission::PermissionRepository;
    use crate::error::{auth::AuthError, token::TokenError, Error};
    use crate::model::permission::{
        ADD_CORPORATE_BLUEPRINT_OWNER, ADD_PERSONAL_BLUEPRINT_OWNER,
    };
    use crate::service::owner::OwnerService;
    use crate::util::eve::{CORPORATE_OWNER_SCOPES, PERSONAL_OWNER_SCOPES};
    use crate::util::test::{
        mock::mock_new_token,
        setup::{test_setup, test_setup_create_user_with_character, TestSetup},
    };
    use crate::worker::queue::WorkerQueue;

    async fn setup() -> Result<(TestSetup, entity::user::Model, entity::user_character::Model), DbErr>
    {
        let test = test_setup().await;
        let db = &test.db;

        let schema = Schema::new(DbBackend::Sqlite);
        let stmts = vec![
            schema.create_table_from_entity(entity::prelude::EveCorporation),
            schema.create_table_from_entity(entity::prelude::EveCharacter),
            schema.create_table_from_entity(entity::prelude::EveType),
            schema.create_table_from_entity(entity::prelude::Location),
            schema.create_table_from_entity(entity::prelude::User),
            schema.create_table_from_entity(entity::prelude::UserCharacter),
            schema.create_table_from_entity(entity::prelude::UserPermission),
            schema.create_table_from_entity(entity::prelude::EsiToken),
            schema.create_table_from_entity(entity::prelude::Owner),
            schema.create_table_from_entity(entity::prelude::Blueprint),
        ];

        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        let (user, user_character) =
            test_setup_create_user_with_character(db, "Hyziri", 2_119_123_456, 98_784_257).await?;

        Ok((test, user, user_character))
    }

    fn corporate_scopes() -> String {
        CORPORATE_OWNER_SCOPES.join(" ")
    }

    fn personal_scopes() -> String {
        PERSONAL_OWNER_SCOPES.join(" ")
    }

    async fn mock_character_endpoints(server: &mut mockito::ServerGuard) {
        server
            .mock("GET", "/characters/2119123456/")
            .with_status(200)
            .with_body(json!({ "name": "Hyziri", "corporation_id": 98_784_257 }).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/corporations/98784257/")
            .with_status(200)
            .with_body(
                json!({ "name": "The Order of Autumn", "ticker": "F4LL." }).to_string(),
            )
            .create_async()
            .await;
    }

    /// Should register a corporate owner, store the token, and enqueue syncs
    #[tokio::test]
    async fn test_register_corporate_owner() -> Result<(), DbErr> {
        let (mut test, user, user_character) = setup().await?;
        PermissionRepository::new(&test.db)
            .grant(user.id, ADD_CORPORATE_BLUEPRINT_OWNER)
            .await?;
        mock_character_endpoints(&mut test.server).await;

        let queue = WorkerQueue::new();
        let service = OwnerService::new(&test.db, &test.esi_client);
        let owner = service
            .register_corporate_owner(
                user.id,
                2_119_123_456,
                mock_new_token(&corporate_scopes()),
                &queue,
            )
            .await
            .unwrap();

        assert_eq!(owner.corporation_id, Some(98_784_257));
        assert!(owner.is_active);

        let tokens = EsiTokenRepository::new(&test.db)
            .get_by_user_character_id(user_character.id)
            .await?;
        assert_eq!(tokens.len(), 1);
        assert_eq!(queue.len(), 3, "Initial blueprint, job, and asset syncs");
        Ok(())
    }

    /// Should refuse registration without the permission
    #[tokio::test]
    async fn test_register_corporate_owner_requires_permission() -> Result<(), DbErr> {
        let (test, user, _) = setup().await?;

        let queue = WorkerQueue::new();
        let service = OwnerService::new(&test.db, &test.esi_client);
        let error = service
            .register_corporate_owner(
                user.id,
                2_119_123_456,
                mock_new_token(&corporate_scopes()),
                &queue,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::AuthError(AuthError::MissingPermission { .. })
        ));
        assert!(queue.is_empty());
        Ok(())
    }

    /// Should refuse a character the user has not linked
    #[tokio::test]
    async fn test_register_corporate_owner_rejects_foreign_character() -> Result<(), DbErr> {
        let (test, user, _) = setup().await?;
        PermissionRepository::new(&test.db)
            .grant(user.id, ADD_CORPORATE_BLUEPRINT_OWNER)
            .await?;

        let queue = WorkerQueue::new();
        let service = OwnerService::new(&test.db, &test.esi_client);
        let error = service
            .register_corporate_owner(
                user.id,
                999_999,
                mock_new_token(&corporate_scopes()),
                &queue,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::AuthError(AuthError::CharacterNotOwned {
                character_id: 999_999,
                ..
            })
        ));
        Ok(())
    }

    /// Should refuse a token missing the corporate scope set
    #[tokio::test]
    async fn test_register_corporate_owner_rejects_missing_scopes() -> Result<(), DbErr> {
        let (test, user, _) = setup().await?;
        PermissionRepository::new(&test.db)
            .grant(user.id, ADD_CORPORATE_BLUEPRINT_OWNER)
            .await?;

        let queue = WorkerQueue::new();
        let service = OwnerService::new(&test.db, &test.esi_client);
        let error = service
            .register_corporate_owner(
                user.id,
                2_119_123_456,
                mock_new_token(&personal_scopes()),
                &queue,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::TokenError(TokenError::InsufficientPermission { .. })
        ));
        assert!(queue.is_empty(), "No syncs for a failed registration");
        Ok(())
    }

    /// Should register a personal owner with a null corporation
    #[tokio::test]
    async fn test_register_personal_owner() -> Result<(), DbErr> {
        let (mut test, user, _) = setup().await?;
        PermissionRepository::new(&test.db)
            .grant(user.id, ADD_PERSONAL_BLUEPRINT_OWNER)
            .await?;
        mock_character_endpoints(&mut test.server).await;

        let queue = WorkerQueue::new();
        let service = OwnerService::new(&test.db, &test.esi_client);
        let owner = service
            .register_personal_owner(
                user.id,
                2_119_123_456,
                mock_new_token(&personal_scopes()),
                &queue,
            )
            .await
            .unwrap();

        assert_eq!(owner.corporation_id, None);
        assert!(owner.is_active);
        assert_eq!(queue.len(), 3);
        Ok(())
    }

    /// Should list the user's owners with blueprint counts
    #[tokio::test]
    async fn test_owners_for_user() -> Result<(), DbErr> {
        let (mut test, user, _) = setup().await?;
        PermissionRepository::new(&test.db)
            .grant(user.id, ADD_CORPORATE_BLUEPRINT_OWNER)
            .await?;
        mock_character_endpoints(&mut test.server).await;

        let queue = WorkerQueue::new();
        let service = OwnerService::new(&test.db, &test.esi_client);
        service
            .register_corporate_owner(
                user.id,
                2_119_123_456,
                mock_new_token(&corporate_scopes()),
                &queue,
            )
            .await
            .unwrap();

        let summaries = service.owners_for_user(user.id).await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "The Order of Autumn");
        assert!(summaries[0].is_corporate);
        assert_eq!(summaries[0].blueprint_count, 0);
        Ok(())
    }

    /// Should pause an owner only for the user who registered it
    #[tokio::test]
    async fn test_set_owner_active_checks_ownership() -> Result<(), DbErr> {
        let (test, user, user_character) = setup().await?;
        let owner = crate::util::test::setup::test_setup_create_owner(
            &test.db,
            user_character.id,
            Some(98_784_257),
        )
        .await?;
        let (stranger, _) =
            test_setup_create_user_with_character(&test.db, "Stranger", 1_001, 2_001).await?;

        let service = OwnerService::new(&test.db, &test.esi_client);

        let paused = service
            .set_owner_active(user.id, owner.id, false)
            .await
            .unwrap();
        assert!(!paused.is_active);

        let error = service
            .set_owner_active(stranger.id, owner.id, true)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            Error::AuthError(AuthError::CharacterNotOwned { .. })
        ));
        Ok(())
    }

    /// Should delete an owner and refuse strangers
    #[tokio::test]
    async fn test_remove_owner() -> Result<(), DbErr> {
        let (test, user, user_character) = setup().await?;
        let owner = crate::util::test::setup::test_setup_create_owner(
            &test.db,
            user_character.id,
            Some(98_784_257),
        )
        .await?;

        let service = OwnerService::new(&test.db, &test.esi_client);
        service.remove_owner(user.id, owner.id).await.unwrap();

        let remaining = OwnerRepository::new(&test.db).get_by_id(owner.id).await?;
        assert!(remaining.is_none());

        let error = service.remove_owner(user.id, owner.id).await.unwrap_err();
        assert!(matches!(error, Error::OwnerNotFound(_)));
        Ok(())
    }
}
