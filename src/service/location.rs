//! Location resolution: turns raw EVE location IDs into named rows.
//!
//! Solar systems and stations come from public endpoints and resolve
//! inline. Structures need an authenticated call that can fail per token,
//! so sync cycles either resolve them on the spot (asset sync, which holds
//! a token and a status snapshot) or store a shell row and enqueue a
//! background resolution (blueprint and job sync, which should not stall
//! on location lookups).

use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::config::SyncConfig;
use crate::data::location::{LocationRepository, ResolvedLocation};
use crate::data::token::EsiTokenRepository;
use crate::error::{esi::EsiError, Error};
use crate::esi::{EsiClient, EsiStatus};
use crate::model::worker::WorkerJob;
use crate::service::registry::RegistryService;
use crate::service::token::{TokenAccess, TokenService};
use crate::util::eve::{classify_location_id, LocationKind, EVE_TYPE_ID_SOLAR_SYSTEM};
use crate::util::time::is_older_than;
use crate::worker::queue::WorkerQueue;

pub struct LocationService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
    config: &'a SyncConfig,
}

impl<'a> LocationService<'a> {
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

    /// Returns a usable location row, resolving it remotely when needed.
    ///
    /// Structure lookups spend authenticated requests, so they pass through
    /// the error budget gate with the caller's `status` snapshot. A
    /// structure the token cannot see degrades to an empty shell rather
    /// than an error.
    pub async fn get_or_resolve(
        &self,
        location_id: i64,
        access_token: &str,
        status: &EsiStatus,
    ) -> Result<entity::location::Model, Error> {
        let repository = LocationRepository::new(self.db);

        if let Some(existing) = repository.get(location_id).await? {
            if self.is_reusable(&existing) {
                return Ok(existing);
            }
        }

        match classify_location_id(location_id) {
            LocationKind::SolarSystem => self.resolve_solar_system(location_id).await,
            LocationKind::Station => self.resolve_station(location_id).await,
            LocationKind::Structure => {
                status.raise_for_status(self.config.error_limit_threshold)?;
                self.resolve_structure(location_id, access_token).await
            }
            LocationKind::Unknown => Ok(repository.ensure_shell(location_id).await?),
        }
    }

    /// Returns a usable location row without blocking on structure lookups.
    ///
    /// Solar systems and stations still resolve inline (public endpoints).
    /// Structures get a shell row immediately and a queued resolution job
    /// carrying the token to retry with; a stale resolved structure is
    /// returned as-is while the refresh runs in the background.
    pub async fn get_or_enqueue(
        &self,
        location_id: i64,
        token_id: i32,
        queue: &WorkerQueue,
    ) -> Result<entity::location::Model, Error> {
        let repository = LocationRepository::new(self.db);

        if let Some(existing) = repository.get(location_id).await? {
            if self.is_reusable(&existing) {
                return Ok(existing);
            }
        }

        match classify_location_id(location_id) {
            LocationKind::SolarSystem => self.resolve_solar_system(location_id).await,
            LocationKind::Station => self.resolve_station(location_id).await,
            LocationKind::Structure => {
                let shell = repository.ensure_shell(location_id).await?;
                queue.push(WorkerJob::ResolveStructure {
                    location_id,
                    token_id,
                });

                Ok(shell)
            }
            LocationKind::Unknown => Ok(repository.ensure_shell(location_id).await?),
        }
    }

    /// Executes a queued structure resolution.
    ///
    /// The token referenced by the job may be gone or dead by the time the
    /// job runs; both leave the shell in place and complete the job, the
    /// next sync cycle enqueues a fresh attempt with a current token.
    pub async fn resolve_structure_job(
        &self,
        location_id: i64,
        token_id: i32,
    ) -> Result<(), Error> {
        let token = match EsiTokenRepository::new(self.db).get_by_id(token_id).await? {
            Some(token) => token,
            None => {
                tracing::debug!(
                    "Token {} is gone, structure {} stays unresolved",
                    token_id,
                    location_id
                );
                return Ok(());
            }
        };

        let token_service = TokenService::new(self.db, self.esi_client);
        let access_token = match token_service.resolve_access(token).await? {
            TokenAccess::Usable(token) => token.access_token,
            TokenAccess::Unrefreshable | TokenAccess::Revoked => {
                tracing::warn!(
                    "No usable token to resolve structure {}, leaving the shell",
                    location_id
                );
                return Ok(());
            }
        };

        let status = self.esi_client.get_status().await?;
        status.raise_for_status(self.config.error_limit_threshold)?;

        self.resolve_structure(location_id, &access_token).await?;

        Ok(())
    }

    /// True when a stored row is fresh enough to use without a remote call.
    ///
    /// Resolved rows go stale after the configured window. Empty shells use
    /// the much shorter grace window instead: long enough to stop a sync
    /// from hammering an unresolvable ID, short enough that a fixed token
    /// gets its retry promptly.
    pub fn is_reusable(&self, location: &entity::location::Model) -> bool {
        let max_age = if location.is_empty() {
            Duration::minutes(self.config.location_empty_grace_minutes)
        } else {
            Duration::hours(self.config.location_stale_hours)
        };

        !is_older_than(location.updated_at, max_age)
    }

    async fn resolve_solar_system(
        &self,
        solar_system_id: i64,
    ) -> Result<entity::location::Model, Error> {
        let registry = RegistryService::new(self.db, self.esi_client);
        let system = registry.ensure_solar_system(solar_system_id).await?;
        registry.ensure_type(EVE_TYPE_ID_SOLAR_SYSTEM).await?;

        let resolved = ResolvedLocation {
            location_id: solar_system_id,
            name: system.name,
            eve_solar_system_id: Some(system.solar_system_id),
            eve_type_id: Some(EVE_TYPE_ID_SOLAR_SYSTEM),
            owner_corporation_id: None,
            parent_id: None,
        };

        Ok(LocationRepository::new(self.db)
            .upsert_resolved(&resolved)
            .await?)
    }

    async fn resolve_station(&self, station_id: i64) -> Result<entity::location::Model, Error> {
        let station = self.esi_client.get_station(station_id).await?;

        let registry = RegistryService::new(self.db, self.esi_client);
        registry.ensure_solar_system(station.system_id).await?;
        registry.ensure_type(station.type_id).await?;

        let resolved = ResolvedLocation {
            location_id: station_id,
            name: station.name,
            eve_solar_system_id: Some(station.system_id),
            eve_type_id: Some(station.type_id),
            owner_corporation_id: station.owner,
            parent_id: None,
        };

        Ok(LocationRepository::new(self.db)
            .upsert_resolved(&resolved)
            .await?)
    }

    async fn resolve_structure(
        &self,
        structure_id: i64,
        access_token: &str,
    ) -> Result<entity::location::Model, Error> {
        let repository = LocationRepository::new(self.db);

        let structure = match self.esi_client.get_structure(structure_id, access_token).await {
            Ok(structure) => structure,
            Err(EsiError::Unauthorized { .. }) | Err(EsiError::Forbidden { .. }) => {
                tracing::warn!(
                    "Structure {} is not visible to the provided token, storing an empty shell",
                    structure_id
                );
                return Ok(repository.overwrite_with_shell(structure_id).await?);
            }
            Err(error) => return Err(error.into()),
        };

        let registry = RegistryService::new(self.db, self.esi_client);
        registry.ensure_solar_system(structure.solar_system_id).await?;
        if let Some(type_id) = structure.type_id {
            registry.ensure_type(type_id).await?;
        }

        let resolved = ResolvedLocation {
            location_id: structure_id,
            name: structure.name,
            eve_solar_system_id: Some(structure.solar_system_id),
            eve_type_id: structure.type_id,
            owner_corporation_id: Some(structure.owner_id),
            parent_id: None,
        };

        Ok(repository.upsert_resolved(&resolved).await?)
    }
}

/// Display text for a location in a listing.
///
/// Containers carry no name of their own and borrow their parent's;
/// anything still unresolved degrades to a placeholder instead of an error.
pub fn display_name(
    location: &entity::location::Model,
    parent: Option<&entity::location::Model>,
) -> String {
    if !location.name.is_empty() {
        return location.name.clone();
    }

    if let Some(parent) = parent {
        if !parent.name.is_empty() {
            return parent.name.clone();
        }
    }

    format!("Unknown location #{}", location.id)
}
