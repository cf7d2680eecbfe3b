//! Reference-data registry: mirrors EVE types, solar systems, corporations,
//! and characters into the local tables other rows reference.

use sea_orm::DatabaseConnection;

use crate::data::eve::{
    character::CharacterRepository, corporation::CorporationRepository,
    eve_type::EveTypeRepository, solar_system::SolarSystemRepository,
};
use crate::error::Error;
use crate::esi::EsiClient;

/// Fetch-on-first-sight cache over the EVE reference tables.
///
/// The `ensure_*` methods return the existing row when one is present and
/// only go to ESI for IDs Brokkr has never seen. Reference data is close to
/// immutable, so rows are not refreshed once stored; the exception is
/// character corporation membership, which callers refresh explicitly via
/// [`RegistryService::refresh_character`] because access checks depend on it.
pub struct RegistryService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
}

impl<'a> RegistryService<'a> {
    pub fn new(db: &'a DatabaseConnection, esi_client: &'a EsiClient) -> Self {
        Self { db, esi_client }
    }

    pub async fn ensure_type(&self, type_id: i64) -> Result<entity::eve_type::Model, Error> {
        let repository = EveTypeRepository::new(self.db);

        if let Some(existing) = repository.get_by_type_id(type_id).await? {
            return Ok(existing);
        }

        let info = self.esi_client.get_type(type_id).await?;

        Ok(repository.upsert(&info).await?)
    }

    pub async fn ensure_solar_system(
        &self,
        solar_system_id: i64,
    ) -> Result<entity::eve_solar_system::Model, Error> {
        let repository = SolarSystemRepository::new(self.db);

        if let Some(existing) = repository.get_by_solar_system_id(solar_system_id).await? {
            return Ok(existing);
        }

        let system = self.esi_client.get_solar_system(solar_system_id).await?;

        Ok(repository.upsert(&system).await?)
    }

    pub async fn ensure_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<entity::eve_corporation::Model, Error> {
        let repository = CorporationRepository::new(self.db);

        if let Some(existing) = repository.get_by_corporation_id(corporation_id).await? {
            return Ok(existing);
        }

        let info = self.esi_client.get_corporation(corporation_id).await?;

        Ok(repository.upsert(corporation_id, &info).await?)
    }

    pub async fn ensure_character(
        &self,
        character_id: i64,
    ) -> Result<entity::eve_character::Model, Error> {
        let repository = CharacterRepository::new(self.db);

        if let Some(existing) = repository.get_by_character_id(character_id).await? {
            return Ok(existing);
        }

        self.refresh_character(character_id).await
    }

    /// Fetches a character from ESI unconditionally and stores the result.
    ///
    /// Corporation membership changes when players move corps, and access
    /// checks key off the stored membership, so registration paths refresh
    /// rather than trust a cached row.
    pub async fn refresh_character(
        &self,
        character_id: i64,
    ) -> Result<entity::eve_character::Model, Error> {
        let info = self.esi_client.get_character(character_id).await?;

        // The character row references its corporation, mirror that first
        self.ensure_corporation(info.corporation_id).await?;

        Ok(CharacterRepository::new(self.db)
            .upsert(character_id, &info)
            .await?)
    }
}
