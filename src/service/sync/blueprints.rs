//! Blueprint synchronization: one full mirror pass per owner.

use std::collections::HashMap;

use sea_orm::DatabaseConnection;

use crate::config::SyncConfig;
use crate::data::blueprint::BlueprintRepository;
use crate::error::Error;
use crate::esi::model::BlueprintItem;
use crate::esi::EsiClient;
use crate::model::blueprint::SyncedBlueprint;
use crate::model::owner::OwnerKind;
use crate::service::location::LocationService;
use crate::service::registry::RegistryService;
use crate::service::sync::begin_cycle;
use crate::util::eve::{CORPORATE_BLUEPRINT_SYNC_SCOPES, PERSONAL_BLUEPRINT_SYNC_SCOPES};
use crate::worker::queue::WorkerQueue;

/// Mirrors an owner's remote blueprint listing into the local table.
pub struct BlueprintSyncService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
    config: &'a SyncConfig,
}

impl<'a> BlueprintSyncService<'a> {
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

    /// Runs one blueprint sync pass for an owner.
    ///
    /// Fetches the full remote listing, normalizes and merges it, refreshes
    /// the type and location rows the blueprints reference, then reconciles
    /// the owner's stored rows against the listing. Blueprints no longer
    /// reported remotely are deleted. Structure locations resolve through
    /// `queue` instead of blocking the pass.
    ///
    /// # Arguments
    ///
    /// * `owner_id` - The owner to sync
    /// * `queue` - Worker queue for deferred structure resolution
    pub async fn sync(&self, owner_id: i32, queue: &WorkerQueue) -> Result<(), Error> {
        let cycle = match begin_cycle(
            self.db,
            self.esi_client,
            self.config,
            owner_id,
            &CORPORATE_BLUEPRINT_SYNC_SCOPES,
            &PERSONAL_BLUEPRINT_SYNC_SCOPES,
        )
        .await?
        {
            Some(cycle) => cycle,
            None => return Ok(()),
        };

        let items = match OwnerKind::of(&cycle.owner, cycle.token.character_id) {
            OwnerKind::Corporate { corporation_id } => {
                self.esi_client
                    .get_corporation_blueprints(corporation_id, &cycle.token.access_token)
                    .await?
            }
            OwnerKind::Personal { character_id } => {
                self.esi_client
                    .get_character_blueprints(character_id, &cycle.token.access_token)
                    .await?
            }
        };
        let remote_count = items.len();

        let blueprints = normalize_and_merge(items);

        // Referenced side tables first, so listings never show dangling IDs.
        let registry = RegistryService::new(self.db, self.esi_client);
        let mut type_ids: Vec<i64> = blueprints
            .iter()
            .map(|blueprint| blueprint.eve_type_id)
            .collect();
        type_ids.sort_unstable();
        type_ids.dedup();
        for type_id in type_ids {
            registry.ensure_type(type_id).await?;
        }

        let locations = LocationService::new(self.db, self.esi_client, self.config);
        let mut location_ids: Vec<i64> = blueprints
            .iter()
            .map(|blueprint| blueprint.location_id)
            .collect();
        location_ids.sort_unstable();
        location_ids.dedup();
        for location_id in location_ids {
            locations
                .get_or_enqueue(location_id, cycle.token.token_id, queue)
                .await?;
        }

        let repository = BlueprintRepository::new(self.db);
        let mut kept_item_ids = Vec::with_capacity(blueprints.len());
        for blueprint in &blueprints {
            repository.upsert(cycle.owner.id, blueprint).await?;
            kept_item_ids.push(blueprint.item_id);
        }
        let deleted = repository
            .delete_by_owner_except(cycle.owner.id, &kept_item_ids)
            .await?;

        tracing::info!(
            "Synced {} blueprints for owner {} ({} remote entries, {} deleted)",
            kept_item_ids.len(),
            cycle.owner.id,
            remote_count,
            deleted
        );

        Ok(())
    }
}

/// Collapses a raw ESI listing into rows ready for persistence.
///
/// Sentinel encodings are decoded first: `runs < 1` means an original with
/// unlimited runs, a negative quantity marks a singleton. Stacks that then
/// match on everything but item ID merge with their quantities summed; the
/// smallest item ID represents the merged stack, so the outcome does not
/// depend on listing order. Entries with research levels ESI cannot legally
/// report are dropped with a warning rather than clamped.
fn normalize_and_merge(items: Vec<BlueprintItem>) -> Vec<SyncedBlueprint> {
    let mut merged: Vec<SyncedBlueprint> = Vec::with_capacity(items.len());
    let mut index: HashMap<(i64, i64, String, i32, i32, Option<i32>), usize> = HashMap::new();

    for item in items {
        if !is_valid_material_efficiency(item.material_efficiency) {
            tracing::warn!(
                "Skipping blueprint {}: material efficiency {} is out of range",
                item.item_id,
                item.material_efficiency
            );
            continue;
        }
        if !is_valid_time_efficiency(item.time_efficiency) {
            tracing::warn!(
                "Skipping blueprint {}: time efficiency {} is not a valid level",
                item.item_id,
                item.time_efficiency
            );
            continue;
        }

        let runs = if item.runs < 1 { None } else { Some(item.runs) };
        let quantity = if item.quantity < 0 { 1 } else { item.quantity };

        let key = (
            item.type_id,
            item.location_id,
            item.location_flag.clone(),
            item.material_efficiency,
            item.time_efficiency,
            runs,
        );
        match index.get(&key) {
            Some(&at) => {
                let stack = &mut merged[at];
                stack.quantity += quantity;
                stack.item_id = stack.item_id.min(item.item_id);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(SyncedBlueprint {
                    item_id: item.item_id,
                    eve_type_id: item.type_id,
                    location_id: item.location_id,
                    location_flag: item.location_flag,
                    quantity,
                    runs,
                    material_efficiency: item.material_efficiency,
                    time_efficiency: item.time_efficiency,
                });
            }
        }
    }

    merged
}

/// Material efficiency runs 0 through 10.
fn is_valid_material_efficiency(value: i32) -> bool {
    (0..=10).contains(&value)
}

/// Time efficiency runs 0 through 20 in steps of two.
fn is_valid_time_efficiency(value: i32) -> bool {
    (0..=20).contains(&value) && value % 2 == 0
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use sea_orm::{ConnectionTrait, DbBackend, DbErr, Schema};

    use super::{is_valid_material_efficiency, is_valid_time_efficiency, normalize_and_merge};
    use crate::config::SyncConfig;
    use crate::data::blueprint::BlueprintRepository;
    use crate::data::location::LocationRepository;
    use crate::data::owner::OwnerRepository;
    use crate::data::token::EsiTokenRepository;
    use crate::esi::model::BlueprintItem;
    use crate::model::worker::WorkerJob;
    use crate::service::sync::blueprints::BlueprintSyncService;
    use crate::util::eve::{CORPORATE_OWNER_SCOPES, PERSONAL_OWNER_SCOPES};
    use crate::util::test::{
        mock::{mock_blueprint_item, mock_new_token, mock_server_status, mock_synced_blueprint},
        setup::{
            test_setup, test_setup_create_location, test_setup_create_owner,
            test_setup_create_type, test_setup_create_user_with_character, TestSetup,
        },
    };
    use crate::worker::queue::WorkerQueue;

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
            schema.create_table_from_entity(entity::prelude::Blueprint),
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

        test_setup_create_type(db, 33519).await?;
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

    /// Should decode the sentinel encodings for originals and copies
    #[test]
    fn normalize_decodes_sentinels() {
        let original = mock_blueprint_item(1001);
        let copy = BlueprintItem {
            quantity: -2,
            runs: 250,
            material_efficiency: 0,
            time_efficiency: 0,
            ..mock_blueprint_item(1002)
        };

        let blueprints = normalize_and_merge(vec![original, copy]);

        assert_eq!(blueprints.len(), 2);
        assert_eq!(blueprints[0].quantity, 1);
        assert_eq!(blueprints[0].runs, None);
        assert_eq!(blueprints[1].quantity, 1);
        assert_eq!(blueprints[1].runs, Some(250));
    }

    /// Should merge stacks differing only by item ID onto the smallest ID
    #[test]
    fn merge_sums_matching_stacks() {
        let researched = BlueprintItem {
            material_efficiency: 5,
            ..mock_blueprint_item(1009)
        };
        let items = vec![
            mock_blueprint_item(1005),
            mock_blueprint_item(1003),
            researched.clone(),
        ];

        let blueprints = normalize_and_merge(items);

        assert_eq!(blueprints.len(), 2);
        assert_eq!(blueprints[0].item_id, 1003);
        assert_eq!(blueprints[0].quantity, 2);
        assert_eq!(blueprints[1].item_id, 1009);

        // Listing order does not change the merged representative.
        let reversed = normalize_and_merge(vec![
            researched,
            mock_blueprint_item(1003),
            mock_blueprint_item(1005),
        ]);
        let stack = reversed
            .iter()
            .find(|blueprint| blueprint.material_efficiency == 10)
            .unwrap();
        assert_eq!(stack.item_id, 1003);
        assert_eq!(stack.quantity, 2);
    }

    /// Should drop entries with research levels ESI cannot legally report
    #[test]
    fn invalid_research_is_skipped() {
        assert!(is_valid_material_efficiency(0));
        assert!(is_valid_material_efficiency(10));
        assert!(!is_valid_material_efficiency(11));
        assert!(!is_valid_material_efficiency(-1));
        assert!(is_valid_time_efficiency(0));
        assert!(is_valid_time_efficiency(20));
        assert!(!is_valid_time_efficiency(7));
        assert!(!is_valid_time_efficiency(22));
        assert!(!is_valid_time_efficiency(-2));

        let over_researched = BlueprintItem {
            material_efficiency: 11,
            ..mock_blueprint_item(1001)
        };
        let odd_time = BlueprintItem {
            time_efficiency: 7,
            ..mock_blueprint_item(1002)
        };

        let blueprints =
            normalize_and_merge(vec![over_researched, odd_time, mock_blueprint_item(1003)]);

        assert_eq!(blueprints.len(), 1);
        assert_eq!(blueprints[0].item_id, 1003);
    }

    /// Should mirror a corporate listing into normalized local rows
    #[tokio::test]
    async fn sync_mirrors_remote_listing() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        mock_status_online(&mut test.server).await;

        let researched = BlueprintItem {
            material_efficiency: 5,
            ..mock_blueprint_item(1002)
        };
        let listing = test
            .server
            .mock("GET", "/corporations/98784257/blueprints/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                serde_json::to_string(&vec![mock_blueprint_item(1001), researched]).unwrap(),
            )
            .create_async()
            .await;

        let queue = WorkerQueue::new();
        let config = SyncConfig::default();
        BlueprintSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id, &queue)
            .await
            .unwrap();
        listing.assert_async().await;

        let stored = BlueprintRepository::new(&test.db)
            .get_by_owner_id(owner.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        let original = stored.iter().find(|row| row.item_id == 1001).unwrap();
        assert_eq!(original.eve_type_id, 33519);
        assert_eq!(original.location_id, 60_003_760);
        assert_eq!(original.quantity, 1);
        assert_eq!(original.runs, None);
        assert_eq!(original.material_efficiency, 10);
        let researched_row = stored.iter().find(|row| row.item_id == 1002).unwrap();
        assert_eq!(researched_row.material_efficiency, 5);
        // Station location resolved inline, nothing deferred.
        assert!(queue.is_empty());
    }

    /// Should leave stored rows in place when a second pass sees the same listing
    #[tokio::test]
    async fn second_pass_leaves_rows_in_place() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        mock_status_online(&mut test.server).await;

        test.server
            .mock("GET", "/corporations/98784257/blueprints/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&vec![mock_blueprint_item(1001)]).unwrap())
            .create_async()
            .await;

        let queue = WorkerQueue::new();
        let config = SyncConfig::default();
        let service = BlueprintSyncService::new(&test.db, &test.esi_client, &config);
        service.sync(owner.id, &queue).await.unwrap();
        service.sync(owner.id, &queue).await.unwrap();

        let stored = BlueprintRepository::new(&test.db)
            .get_by_owner_id(owner.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].item_id, 1001);
    }

    /// Should delete stored blueprints the remote listing no longer reports
    #[tokio::test]
    async fn vanished_blueprints_are_deleted() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        mock_status_online(&mut test.server).await;

        let repository = BlueprintRepository::new(&test.db);
        repository
            .upsert(owner.id, &mock_synced_blueprint(999, 33519, 60_003_760))
            .await
            .unwrap();

        test.server
            .mock("GET", "/corporations/98784257/blueprints/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&vec![mock_blueprint_item(1001)]).unwrap())
            .create_async()
            .await;

        let queue = WorkerQueue::new();
        let config = SyncConfig::default();
        BlueprintSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id, &queue)
            .await
            .unwrap();

        assert!(repository.get_by_item_id(999).await.unwrap().is_none());
        assert!(repository.get_by_item_id(1001).await.unwrap().is_some());
    }

    /// Should skip a paused owner without touching ESI
    #[tokio::test]
    async fn paused_owner_is_skipped() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        OwnerRepository::new(&test.db)
            .set_active(owner.id, false)
            .await
            .unwrap();

        let status = test
            .server
            .mock("GET", "/status/")
            .expect(0)
            .create_async()
            .await;

        let queue = WorkerQueue::new();
        let config = SyncConfig::default();
        BlueprintSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id, &queue)
            .await
            .unwrap();

        status.assert_async().await;
    }

    /// Should list character blueprints for a personal owner
    #[tokio::test]
    async fn personal_owner_lists_character_blueprints() {
        let (mut test, owner) = setup(None).await.unwrap();
        mock_status_online(&mut test.server).await;

        let listing = test
            .server
            .mock("GET", "/characters/2119123456/blueprints/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&vec![mock_blueprint_item(1001)]).unwrap())
            .create_async()
            .await;

        let queue = WorkerQueue::new();
        let config = SyncConfig::default();
        BlueprintSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id, &queue)
            .await
            .unwrap();
        listing.assert_async().await;

        let stored = BlueprintRepository::new(&test.db)
            .get_by_owner_id(owner.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    /// Should defer structure resolution to the worker queue
    #[tokio::test]
    async fn structure_locations_resolve_in_background() {
        let (mut test, owner) = setup(Some(98_784_257)).await.unwrap();
        mock_status_online(&mut test.server).await;

        let in_structure = BlueprintItem {
            location_id: 1_035_466_617_946,
            ..mock_blueprint_item(1001)
        };
        test.server
            .mock("GET", "/corporations/98784257/blueprints/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(serde_json::to_string(&vec![in_structure]).unwrap())
            .create_async()
            .await;

        let queue = WorkerQueue::new();
        let config = SyncConfig::default();
        BlueprintSyncService::new(&test.db, &test.esi_client, &config)
            .sync(owner.id, &queue)
            .await
            .unwrap();

        let stored = BlueprintRepository::new(&test.db)
            .get_by_owner_id(owner.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].location_id, 1_035_466_617_946);

        let shell = LocationRepository::new(&test.db)
            .get(1_035_466_617_946)
            .await
            .unwrap()
            .unwrap();
        assert!(shell.is_empty());

        let (job, _guard) = queue.pop().unwrap();
        assert!(matches!(
            job,
            WorkerJob::ResolveStructure {
                location_id: 1_035_466_617_946,
                ..
            }
        ));
    }
}
