use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

/// Fields of a fully resolved location, ready for upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub location_id: i64,
    pub name: String,
    pub eve_solar_system_id: Option<i64>,
    pub eve_type_id: Option<i64>,
    pub owner_corporation_id: Option<i64>,
    pub parent_id: Option<i64>,
}

pub struct LocationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LocationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, location_id: i64) -> Result<Option<entity::location::Model>, DbErr> {
        entity::prelude::Location::find_by_id(location_id)
            .one(self.db)
            .await
    }

    pub async fn get_many(
        &self,
        location_ids: &[i64],
    ) -> Result<Vec<entity::location::Model>, DbErr> {
        entity::prelude::Location::find()
            .filter(entity::location::Column::Id.is_in(location_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Writes a fully resolved location, replacing whatever was there.
    pub async fn upsert_resolved(
        &self,
        location: &ResolvedLocation,
    ) -> Result<entity::location::Model, DbErr> {
        let model = entity::location::ActiveModel {
            id: ActiveValue::Set(location.location_id),
            name: ActiveValue::Set(location.name.clone()),
            parent_id: ActiveValue::Set(location.parent_id),
            eve_solar_system_id: ActiveValue::Set(location.eve_solar_system_id),
            eve_type_id: ActiveValue::Set(location.eve_type_id),
            owner_corporation_id: ActiveValue::Set(location.owner_corporation_id),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        entity::prelude::Location::insert(model)
            .on_conflict(
                OnConflict::column(entity::location::Column::Id)
                    .update_columns([
                        entity::location::Column::Name,
                        entity::location::Column::ParentId,
                        entity::location::Column::EveSolarSystemId,
                        entity::location::Column::EveTypeId,
                        entity::location::Column::OwnerCorporationId,
                        entity::location::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    /// Creates an empty placeholder row if none exists, never overwrites.
    ///
    /// Race-safe across concurrent sync units: the conflict clause swallows
    /// the duplicate insert instead of erroring.
    pub async fn ensure_shell(&self, location_id: i64) -> Result<entity::location::Model, DbErr> {
        if let Some(existing) = self.get(location_id).await? {
            return Ok(existing);
        }

        let shell = entity::location::ActiveModel {
            id: ActiveValue::Set(location_id),
            name: ActiveValue::Set(String::new()),
            parent_id: ActiveValue::Set(None),
            eve_solar_system_id: ActiveValue::Set(None),
            eve_type_id: ActiveValue::Set(None),
            owner_corporation_id: ActiveValue::Set(None),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        entity::prelude::Location::insert(shell)
            .on_conflict(
                OnConflict::column(entity::location::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        self.get(location_id).await?.ok_or_else(|| {
            DbErr::RecordNotFound(format!("location {} vanished after insert", location_id))
        })
    }

    /// Blanks a location whose structure became inaccessible.
    ///
    /// The parent link is preserved, a container hierarchy built by an asset
    /// sync survives one owner losing docking access.
    pub async fn overwrite_with_shell(
        &self,
        location_id: i64,
    ) -> Result<entity::location::Model, DbErr> {
        let shell = entity::location::ActiveModel {
            id: ActiveValue::Set(location_id),
            name: ActiveValue::Set(String::new()),
            parent_id: ActiveValue::Set(None),
            eve_solar_system_id: ActiveValue::Set(None),
            eve_type_id: ActiveValue::Set(None),
            owner_corporation_id: ActiveValue::Set(None),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        entity::prelude::Location::insert(shell)
            .on_conflict(
                OnConflict::column(entity::location::Column::Id)
                    .update_columns([
                        entity::location::Column::Name,
                        entity::location::Column::EveSolarSystemId,
                        entity::location::Column::EveTypeId,
                        entity::location::Column::OwnerCorporationId,
                        entity::location::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    /// Links a container location to its parent and records its type.
    ///
    /// Touches only the hierarchy columns so a resolved name (if the
    /// container ID ever was something resolvable) is left alone.
    pub async fn upsert_container(
        &self,
        location_id: i64,
        parent_id: Option<i64>,
        eve_type_id: i64,
    ) -> Result<entity::location::Model, DbErr> {
        let model = entity::location::ActiveModel {
            id: ActiveValue::Set(location_id),
            name: ActiveValue::Set(String::new()),
            parent_id: ActiveValue::Set(parent_id),
            eve_solar_system_id: ActiveValue::Set(None),
            eve_type_id: ActiveValue::Set(Some(eve_type_id)),
            owner_corporation_id: ActiveValue::Set(None),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        entity::prelude::Location::insert(model)
            .on_conflict(
                OnConflict::column(entity::location::Column::Id)
                    .update_columns([
                        entity::location::Column::ParentId,
                        entity::location::Column::EveTypeId,
                        entity::location::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }
}
