use migration::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, EntityTrait};

use crate::esi::model::SolarSystem;

pub struct SolarSystemRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SolarSystemRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn upsert(
        &self,
        system: &SolarSystem,
    ) -> Result<entity::eve_solar_system::Model, DbErr> {
        let model = entity::eve_solar_system::ActiveModel {
            solar_system_id: ActiveValue::Set(system.system_id),
            name: ActiveValue::Set(system.name.clone()),
            security_status: ActiveValue::Set(system.security_status),
        };

        entity::prelude::EveSolarSystem::insert(model)
            .on_conflict(
                OnConflict::column(entity::eve_solar_system::Column::SolarSystemId)
                    .update_columns([
                        entity::eve_solar_system::Column::Name,
                        entity::eve_solar_system::Column::SecurityStatus,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    pub async fn get_by_solar_system_id(
        &self,
        solar_system_id: i64,
    ) -> Result<Option<entity::eve_solar_system::Model>, DbErr> {
        entity::prelude::EveSolarSystem::find_by_id(solar_system_id)
            .one(self.db)
            .await
    }
}
