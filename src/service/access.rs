//! Permission-aware visibility queries.
//!
//! Everything here is computed from persisted state only, no ESI calls: a
//! user's visible corporations come from their linked characters, widened
//! to alliance-mates when they hold the alliance visibility grant. Personal
//! owners piggyback on the same corporation scope through their linked
//! character's membership. Management rights are narrower than visibility
//! and never widen to the alliance.

use std::collections::{HashMap, HashSet};

use sea_orm::DatabaseConnection;

use crate::data::blueprint::BlueprintRepository;
use crate::data::eve::{character::CharacterRepository, corporation::CorporationRepository};
use crate::data::eve::eve_type::EveTypeRepository;
use crate::data::industry_job::IndustryJobRepository;
use crate::data::location::LocationRepository;
use crate::data::owner::OwnerRepository;
use crate::data::user::{permission::PermissionRepository, user_character::UserCharacterRepository};
use crate::error::{auth::AuthError, Error};
use crate::model::blueprint::BlueprintSummary;
use crate::model::industry_job::{IndustryJobSummary, JobActivity};
use crate::model::permission::{
    BASIC_ACCESS, VIEW_ALLIANCE_BLUEPRINTS, VIEW_BLUEPRINT_LOCATIONS, VIEW_INDUSTRY_JOBS,
};
use crate::service::location::display_name;

pub struct AccessService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccessService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Errors with [`AuthError::MissingPermission`] unless the user holds
    /// `permission`.
    pub async fn require_permission(
        &self,
        user_id: i32,
        permission: &'static str,
    ) -> Result<(), Error> {
        let granted = PermissionRepository::new(self.db)
            .has_permission(user_id, permission)
            .await?;

        if !granted {
            return Err(AuthError::MissingPermission {
                user_id,
                permission,
            }
            .into());
        }

        Ok(())
    }

    /// Corporation IDs whose owners the user may see.
    ///
    /// The corporations of the user's own characters, plus every
    /// corporation sharing an alliance with them when the user holds the
    /// alliance visibility grant.
    pub async fn visible_corporation_ids(&self, user_id: i32) -> Result<Vec<i64>, Error> {
        let character_ids = UserCharacterRepository::new(self.db)
            .get_character_ids(user_id)
            .await?;
        let mut corporation_ids = CharacterRepository::new(self.db)
            .get_corporation_ids(&character_ids)
            .await?;

        let widen = PermissionRepository::new(self.db)
            .has_permission(user_id, VIEW_ALLIANCE_BLUEPRINTS)
            .await?;
        if widen {
            let corporation_repository = CorporationRepository::new(self.db);
            let alliance_ids = corporation_repository
                .get_alliance_ids(&corporation_ids)
                .await?;
            for corporation_id in corporation_repository
                .get_corporation_ids_in_alliances(&alliance_ids)
                .await?
            {
                if !corporation_ids.contains(&corporation_id) {
                    corporation_ids.push(corporation_id);
                }
            }
        }

        Ok(corporation_ids)
    }

    /// Owners whose blueprints and jobs the user may see.
    pub async fn visible_owners(&self, user_id: i32) -> Result<Vec<entity::owner::Model>, Error> {
        let visible_corporations = self.visible_corporation_ids(user_id).await?;
        let owners = OwnerRepository::new(self.db).get_all().await?;
        let personal_corporations = self.personal_owner_corporations(&owners).await?;

        Ok(owners
            .into_iter()
            .filter(|owner| match owner.corporation_id {
                Some(corporation_id) => visible_corporations.contains(&corporation_id),
                None => personal_corporations
                    .get(&owner.id)
                    .is_some_and(|corporation_id| visible_corporations.contains(corporation_id)),
            })
            .collect())
    }

    /// Owners the user may act on when working requests.
    ///
    /// Corporate owners of the user's own corporations and personal owners
    /// of the user's own characters. Alliance visibility does not grant
    /// management rights.
    pub async fn manageable_owners(
        &self,
        user_id: i32,
    ) -> Result<Vec<entity::owner::Model>, Error> {
        let character_ids = UserCharacterRepository::new(self.db)
            .get_character_ids(user_id)
            .await?;
        let own_corporations = CharacterRepository::new(self.db)
            .get_corporation_ids(&character_ids)
            .await?;
        let own_links: HashSet<i32> = UserCharacterRepository::new(self.db)
            .get_by_user_id(user_id)
            .await?
            .into_iter()
            .map(|link| link.id)
            .collect();

        let owners = OwnerRepository::new(self.db).get_all().await?;

        Ok(owners
            .into_iter()
            .filter(|owner| match owner.corporation_id {
                Some(corporation_id) => own_corporations.contains(&corporation_id),
                None => own_links.contains(&owner.user_character_id),
            })
            .collect())
    }

    /// Blueprint listing scoped and annotated for one user.
    ///
    /// # Arguments
    /// - `user_id`: The user requesting the listing
    ///
    /// # Returns
    /// Summaries of every blueprint belonging to a visible owner, sorted by
    /// type name. The location column is only populated for users holding
    /// the location permission, and `in_use` marks blueprints currently
    /// held by an industry job.
    pub async fn accessible_blueprints(
        &self,
        user_id: i32,
    ) -> Result<Vec<BlueprintSummary>, Error> {
        self.require_permission(user_id, BASIC_ACCESS).await?;

        let owners = self.visible_owners(user_id).await?;
        let owner_ids: Vec<i32> = owners.iter().map(|owner| owner.id).collect();
        let owner_names = self.owner_display_names(&owners).await?;

        let blueprints = BlueprintRepository::new(self.db)
            .get_by_owner_ids(&owner_ids)
            .await?;

        let type_ids: Vec<i64> = dedup(blueprints.iter().map(|blueprint| blueprint.eve_type_id));
        let type_names: HashMap<i64, String> = EveTypeRepository::new(self.db)
            .get_by_type_ids(&type_ids)
            .await?
            .into_iter()
            .map(|row| (row.type_id, row.name))
            .collect();

        let item_ids: Vec<i64> = blueprints.iter().map(|blueprint| blueprint.item_id).collect();
        let in_use: HashSet<i64> = IndustryJobRepository::new(self.db)
            .get_by_blueprint_ids(&item_ids)
            .await?
            .into_iter()
            .map(|job| job.blueprint_id)
            .collect();

        let show_locations = PermissionRepository::new(self.db)
            .has_permission(user_id, VIEW_BLUEPRINT_LOCATIONS)
            .await?;
        let locations = if show_locations {
            let location_ids: Vec<i64> =
                dedup(blueprints.iter().map(|blueprint| blueprint.location_id));
            Some(self.location_names(&location_ids).await?)
        } else {
            None
        };

        let mut summaries: Vec<BlueprintSummary> = blueprints
            .into_iter()
            .map(|blueprint| {
                let is_original = blueprint.is_original();

                BlueprintSummary {
                    item_id: blueprint.item_id,
                    type_name: type_names
                        .get(&blueprint.eve_type_id)
                        .cloned()
                        .unwrap_or_else(|| format!("Type #{}", blueprint.eve_type_id)),
                    owner_name: owner_names
                        .get(&blueprint.owner_id)
                        .cloned()
                        .unwrap_or_else(|| format!("Owner #{}", blueprint.owner_id)),
                    location: locations
                        .as_ref()
                        .map(|names| location_display(names, blueprint.location_id)),
                    material_efficiency: blueprint.material_efficiency,
                    time_efficiency: blueprint.time_efficiency,
                    is_original,
                    runs: blueprint.runs,
                    quantity: blueprint.quantity,
                    in_use: in_use.contains(&blueprint.item_id),
                }
            })
            .collect();

        summaries.sort_by(|a, b| a.type_name.cmp(&b.type_name).then(a.item_id.cmp(&b.item_id)));

        Ok(summaries)
    }

    /// Industry job listing scoped and annotated for one user.
    pub async fn list_industry_jobs(
        &self,
        user_id: i32,
    ) -> Result<Vec<IndustryJobSummary>, Error> {
        self.require_permission(user_id, VIEW_INDUSTRY_JOBS).await?;

        let owners = self.visible_owners(user_id).await?;
        let owner_ids: Vec<i32> = owners.iter().map(|owner| owner.id).collect();
        let owner_names = self.owner_display_names(&owners).await?;

        let jobs = IndustryJobRepository::new(self.db)
            .get_by_owner_ids(&owner_ids)
            .await?;

        let blueprint_ids: Vec<i64> = dedup(jobs.iter().map(|job| job.blueprint_id));
        let blueprints = BlueprintRepository::new(self.db)
            .get_by_item_ids(&blueprint_ids)
            .await?;
        let blueprint_types: HashMap<i64, i64> = blueprints
            .iter()
            .map(|blueprint| (blueprint.item_id, blueprint.eve_type_id))
            .collect();

        let type_ids: Vec<i64> = dedup(blueprints.iter().map(|blueprint| blueprint.eve_type_id));
        let type_names: HashMap<i64, String> = EveTypeRepository::new(self.db)
            .get_by_type_ids(&type_ids)
            .await?
            .into_iter()
            .map(|row| (row.type_id, row.name))
            .collect();

        let installer_ids: Vec<i64> = dedup(jobs.iter().map(|job| job.installer_id));
        let installer_names: HashMap<i64, String> = CharacterRepository::new(self.db)
            .get_by_character_ids(&installer_ids)
            .await?
            .into_iter()
            .map(|character| (character.character_id, character.name))
            .collect();

        let mut summaries: Vec<IndustryJobSummary> = jobs
            .into_iter()
            .map(|job| IndustryJobSummary {
                job_id: job.job_id,
                blueprint_type_name: blueprint_types
                    .get(&job.blueprint_id)
                    .and_then(|type_id| type_names.get(type_id))
                    .cloned()
                    .unwrap_or_else(|| format!("Blueprint #{}", job.blueprint_id)),
                owner_name: owner_names
                    .get(&job.owner_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Owner #{}", job.owner_id)),
                activity: JobActivity::display(job.activity),
                installer_name: installer_names.get(&job.installer_id).cloned(),
                runs: job.runs,
                start_date: job.start_date,
                end_date: job.end_date,
                status: job.status,
            })
            .collect();

        summaries.sort_by(|a, b| a.end_date.cmp(&b.end_date).then(a.job_id.cmp(&b.job_id)));

        Ok(summaries)
    }

    /// Display names per owner ID: corporation name for corporate owners,
    /// linked character name for personal ones.
    pub(crate) async fn owner_display_names(
        &self,
        owners: &[entity::owner::Model],
    ) -> Result<HashMap<i32, String>, Error> {
        let corporation_ids: Vec<i64> =
            owners.iter().filter_map(|owner| owner.corporation_id).collect();
        let corporation_names: HashMap<i64, String> = CorporationRepository::new(self.db)
            .get_by_corporation_ids(&corporation_ids)
            .await?
            .into_iter()
            .map(|corporation| (corporation.corporation_id, corporation.name))
            .collect();

        let link_character_ids = self.link_character_ids(owners).await?;
        let character_ids: Vec<i64> = link_character_ids.values().copied().collect();
        let character_names: HashMap<i64, String> = CharacterRepository::new(self.db)
            .get_by_character_ids(&character_ids)
            .await?
            .into_iter()
            .map(|character| (character.character_id, character.name))
            .collect();

        let mut names = HashMap::new();
        for owner in owners {
            let name = match owner.corporation_id {
                Some(corporation_id) => corporation_names.get(&corporation_id).cloned(),
                None => link_character_ids
                    .get(&owner.user_character_id)
                    .and_then(|character_id| character_names.get(character_id))
                    .cloned(),
            };
            names.insert(
                owner.id,
                name.unwrap_or_else(|| format!("Owner #{}", owner.id)),
            );
        }

        Ok(names)
    }

    /// Corporation membership of each personal owner's linked character,
    /// keyed by owner ID.
    async fn personal_owner_corporations(
        &self,
        owners: &[entity::owner::Model],
    ) -> Result<HashMap<i32, i64>, Error> {
        let link_character_ids = self.link_character_ids(owners).await?;
        let character_ids: Vec<i64> = link_character_ids.values().copied().collect();
        let character_corporations: HashMap<i64, i64> = CharacterRepository::new(self.db)
            .get_by_character_ids(&character_ids)
            .await?
            .into_iter()
            .map(|character| (character.character_id, character.corporation_id))
            .collect();

        Ok(owners
            .iter()
            .filter(|owner| !owner.is_corporate())
            .filter_map(|owner| {
                link_character_ids
                    .get(&owner.user_character_id)
                    .and_then(|character_id| character_corporations.get(character_id))
                    .map(|corporation_id| (owner.id, *corporation_id))
            })
            .collect())
    }

    /// Character ID behind each personal owner's character link.
    async fn link_character_ids(
        &self,
        owners: &[entity::owner::Model],
    ) -> Result<HashMap<i32, i64>, Error> {
        let link_ids: Vec<i32> = owners
            .iter()
            .filter(|owner| !owner.is_corporate())
            .map(|owner| owner.user_character_id)
            .collect();
        if link_ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(UserCharacterRepository::new(self.db)
            .get_by_ids(&link_ids)
            .await?
            .into_iter()
            .map(|link| (link.id, link.character_id))
            .collect())
    }

    /// Display text per location ID, with container rows borrowing their
    /// parent's name.
    async fn location_names(&self, location_ids: &[i64]) -> Result<HashMap<i64, String>, Error> {
        let repository = LocationRepository::new(self.db);
        let locations = repository.get_many(location_ids).await?;

        let parent_ids: Vec<i64> = dedup(
            locations
                .iter()
                .filter_map(|location| location.parent_id),
        );
        let parents: HashMap<i64, entity::location::Model> = repository
            .get_many(&parent_ids)
            .await?
            .into_iter()
            .map(|parent| (parent.id, parent))
            .collect();

        Ok(locations
            .into_iter()
            .map(|location| {
                let parent = location.parent_id.and_then(|parent_id| parents.get(&parent_id));
                (location.id, display_name(&location, parent))
            })
            .collect())
    }
}

fn location_display(names: &HashMap<i64, String>, location_id: i64) -> String {
    names
        .get(&location_id)
        .cloned()
        .unwrap_or_else(|| format!("Unknown location #{}", location_id))
}

fn dedup<I: Iterator<Item = i64>>(ids: I) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
