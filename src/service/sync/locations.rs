//! Asset container locations: one linking pass per owner.

use std::collections::HashMap;

use sea_orm::DatabaseConnection;

use crate::config::SyncConfig;
use crate::data::location::LocationRepository;
use crate::error::Error;
use crate::esi::model::AssetItem;
use crate::esi::EsiClient;
use crate::model::owner::OwnerKind;
use crate::service::location::LocationService;
use crate::service::registry::RegistryService;
use crate::service::sync::begin_cycle;
use crate::util::eve::{CORPORATE_ASSET_SYNC_SCOPES, PERSONAL_ASSET_SYNC_SCOPES};

/// Links an owner's asset containers to the locations that hold them.
pub struct LocationSyncService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
    config: &'a SyncConfig,
}

impl<'a> LocationSyncService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        esi_client: &'a EsiClient,
        config: &'a SyncConfig,
    ) -> Self {
        Self {
            db,
            esi_client,
            config,
        }
    }

    /// Runs one asset container pass for an owner.
    ///
    /// Scans the owner's asset listing for containers, assets that other
    /// assets report as their location. Each container gets a location row
    /// linking one hop up to whatever holds it, so blueprint listings can
    /// name the station or structure a container actually sits in. This
    /// pass already holds a token and a status snapshot, so structure
    /// parents resolve inline; one the token cannot see degrades to an
    /// empty shell.
    pub async fn sync(&self, owner_id: i32) -> Result<(), Error> {
        let cycle = match begin_cycle(
            self.db,
            self.esi_client,
            self.config,
            owner_id,
            &CORPORATE_ASSET_SYNC_SCOPES,
            &PERSONAL_ASSET_SYNC_SCOPES,
        )
        .await?
        {
            Some(cycle) => cycle,
            None => return Ok(()),
        };

        let assets = match OwnerKind::of(&cycle.owner, cycle.token.character_id) {
            OwnerKind::Corporate { corporation_id } => {
                self.esi_client
                    .get_corporation_assets(corporation_id, &cycle.token.access_token)
                    .await?
            }
            OwnerKind::Personal { character_id } => {
                self.esi_client
                    .get_character_assets(character_id, &cycle.token.access_token)
                    .await?
            }
        };

        // An asset is a container exactly when another asset sits inside it.
        let by_item_id: HashMap<i64, &AssetItem> =
            assets.iter().map(|asset| (asset.item_id, asset)).collect();
        let mut container_ids: Vec<i64> = assets
            .iter()
            .map(|asset| asset.location_id)
            .filter(|location_id| by_item_id.contains_key(location_id))
            .collect();
        container_ids.sort_unstable();
        container_ids.dedup();

        let registry = RegistryService::new(self.db, self.esi_client);
        let locations = LocationService::new(self.db, self.esi_client, self.config);
        let repository = LocationRepository::new(self.db);

        for container_id in &container_ids {
            let Some(container) = by_item_id.get(container_id) else {
                continue;
            };
            let parent = locations
                .get_or_resolve(
                    container.location_id,
                    &cycle.token.access_token,
                    &cycle.status,
                )
                .await?;
            registry.ensure_type(container.type_id).await?;
            repository
                .upsert_container(container.item_id, Some(parent.id), container.type_id)
                .await?;
        }

        tracing::info!(
            "Linked {} asset containers for owner {}",
            container_ids.len(),
            cycle.owner.id
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use sea_orm::{ConnectionTrait, DbBackend, DbErr, Schema};
    use serde_json::json;

    use crate::config::SyncConfig;
    use crate::data::location::LocationRepository;
    use crate::data::token::EsiTokenRepository;
    use crate::service::sync::locations::LocationSyncService;
    use crate::util::eve::{CORPORATE_OWNER_SCOPES, PERSONAL_OWNER_SCOPES};
    use crate::util::test::{
        mock::{mock_asset_item, mock_new_token, mock_server_status},
        setup::{
            test_setup, test_setup_create_location, test_setup_create_owner,
            test_setup_create_type, test_setup_create_user_with_character, TestSetup,
        },
    };

    const STRUCTURE_ID: i64 = 1_035_466_617_946;

    async fn setup(corporation_id: Option<i64>) -> Result<(TestSetup, entity::owner::Model), DbErr> {
        let test = test_setup().await;
        let db = &test.db;

        let schema = Schema::new(DbBackend::Sqlite);
        let stmts = vec![
            schema.create_table_from_entity(entity::prelude::EveCorporation),
            schema.create_table_from_entity(entity::prelude::EveCharacter),
            schema.create_table_from_entity(entity::prelude::EveType),
            schema.create_table_from_entity(entity::prelude::EveSolarSystem),
            schema.create_table_from_entity(entity::prelude::Location),
            schema.create_table_from_entity(entity::prelude::User),
            schema.create_table_from_entity(entity::prelude::UserCharacter),
            schema.create_table_from_entity(entity::prelude::EsiToken),
            schema.create_table_from_entity(entity::prelude::Owner),
        ];
        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        let (_, user_character) =
            test_setup_create_user_with_character(db, "Hyziri", 2_119_123_456, 98_784_257).await?;
        let owner = test_setup_create_owner(db, user_character.id, corporation_id).await?;

        let scopes = match corporation_id {
            Some(_) => CORPORATE_OWNER_SCOPES.join(" "),
            None => PERSONAL_OWNER_SCOPES.join(" "),
        };
        EsiTokenRepository::new(db)
            .create(user_character.id, &mock_new_token(&scopes))
            .await?;

        // Station Container type plus the Jita station most tests park it in.
        test_setup_create_type(db, 17_368).await?;
        test_setup_create_location(db, 60_003_760).await?;

        Ok((test, owner))
    }

    async fn mock_status_online(server: &mut mockito::ServerGuard) {
        server
            .mock("GET", "/status/")
            .with_status(200)
            .with_header("x-esi-error-limit-remain", "100")
            .with_header("x-esi-error-limit-reset", "60")
            .with_body(serde_json::to_string(&mock_server_status(None)).unwrap())
            .create_async()
            .await;
    }

    /// Should link a container to its station and ignore plain assets
    #[tokio::test]
    async fn containers_link_to_their_station() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        mock_status_online(&mut test.server).await;

        let assets = vec![
            mock_asset_item(3001, 60_003_760, 17_368),
            mock_asset_item(4001, 3001, 33_519),
        ];
        let listing = test
            .server
            .mock("GET", "/corporations/98784257/assets/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&assets).unwrap())
            .create_async()
            .await;

        let config = SyncConfig::default();
        LocationSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id)
            .await
            .unwrap();
        listing.assert_async().await;

        let repository = LocationRepository::new(&test.db);
        let container = repository.get(3001).await.unwrap().unwrap();
        assert_eq!(container.parent_id, Some(60_003_760));
        assert_eq!(container.eve_type_id, Some(17_368));
        // The blueprint inside the container is not itself a container.
        assert!(repository.get(4001).await.unwrap().is_none());
    }

    /// Should link nested containers one hop at a time
    #[tokio::test]
    async fn nested_containers_link_one_hop() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        mock_status_online(&mut test.server).await;

        let assets = vec![
            mock_asset_item(3001, 60_003_760, 17_368),
            mock_asset_item(3002, 3001, 17_368),
            mock_asset_item(4001, 3002, 33_519),
        ];
        test.server
            .mock("GET", "/corporations/98784257/assets/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&assets).unwrap())
            .create_async()
            .await;

        let config = SyncConfig::default();
        LocationSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id)
            .await
            .unwrap();

        let repository = LocationRepository::new(&test.db);
        let outer = repository.get(3001).await.unwrap().unwrap();
        assert_eq!(outer.parent_id, Some(60_003_760));
        let inner = repository.get(3002).await.unwrap().unwrap();
        assert_eq!(inner.parent_id, Some(3001));
    }

    /// Should resolve a structure parent inline with the cycle's token
    #[tokio::test]
    async fn structure_parents_resolve_inline() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        mock_status_online(&mut test.server).await;

        let assets = vec![
            mock_asset_item(3001, STRUCTURE_ID, 17_368),
            mock_asset_item(4001, 3001, 33_519),
        ];
        test.server
            .mock("GET", "/corporations/98784257/assets/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&assets).unwrap())
            .create_async()
            .await;
        test.server
            .mock("GET", format!("/universe/structures/{}/", STRUCTURE_ID).as_str())
            .match_header("authorization", "Bearer access-1")
            .with_status(200)
            .with_body(
                json!({
                    "name": "Jita - Autumn Forge",
                    "owner_id": 98_784_257,
                    "solar_system_id": 30_000_142,
                    "type_id": 35_827
                })
                .to_string(),
            )
            .create_async()
            .await;
        test.server
            .mock("GET", "/universe/systems/30000142/")
            .with_status(200)
            .with_body(
                json!({ "system_id": 30_000_142, "name": "Jita", "security_status": 0.9459 })
                    .to_string(),
            )
            .create_async()
            .await;
        test.server
            .mock("GET", "/universe/types/35827/")
            .with_status(200)
            .with_body(json!({ "type_id": 35_827, "name": "Sotiyo" }).to_string())
            .create_async()
            .await;

        let config = SyncConfig::default();
        LocationSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id)
            .await
            .unwrap();

        let repository = LocationRepository::new(&test.db);
        let container = repository.get(3001).await.unwrap().unwrap();
        assert_eq!(container.parent_id, Some(STRUCTURE_ID));
        let structure = repository.get(STRUCTURE_ID).await.unwrap().unwrap();
        assert_eq!(structure.name, "Jita - Autumn Forge");
        assert_eq!(structure.owner_corporation_id, Some(98_784_257));
    }

    /// Should degrade an invisible structure parent to an empty shell
    #[tokio::test]
    async fn invisible_structure_parent_becomes_shell() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        mock_status_online(&mut test.server).await;

        let assets = vec![
            mock_asset_item(3001, STRUCTURE_ID, 17_368),
            mock_asset_item(4001, 3001, 33_519),
        ];
        test.server
            .mock("GET", "/corporations/98784257/assets/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&assets).unwrap())
            .create_async()
            .await;
        test.server
            .mock("GET", format!("/universe/structures/{}/", STRUCTURE_ID).as_str())
            .with_status(403)
            .with_body(json!({ "error": "Forbidden" }).to_string())
            .create_async()
            .await;

        let config = SyncConfig::default();
        LocationSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id)
            .await
            .unwrap();

        let repository = LocationRepository::new(&test.db);
        let container = repository.get(3001).await.unwrap().unwrap();
        assert_eq!(container.parent_id, Some(STRUCTURE_ID));
        let shell = repository.get(STRUCTURE_ID).await.unwrap().unwrap();
        assert!(shell.is_empty());
    }

    /// Should list character assets for a personal owner
    #[tokio::test]
    async fn personal_owner_lists_character_assets() {
        let (mut test, owner) = setup(None).await.unwrap();
        mock_status_online(&mut test.server).await;

        let assets = vec![
            mock_asset_item(3001, 60_003_760, 17_368),
            mock_asset_item(4001, 3001, 33_519),
        ];
        let listing = test
            .server
            .mock("GET", "/characters/2119123456/assets/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&assets).unwrap())
            .create_async()
            .await;

        let config = SyncConfig::default();
        LocationSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id)
            .await
            .unwrap();
        listing.assert_async().await;

        let container = LocationRepository::new(&test.db)
            .get(3001)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(container.parent_id, Some(60_003_760));
    }
}
