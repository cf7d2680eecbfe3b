use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
};

use crate::esi::model::CorporationInfo;

pub struct CorporationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CorporationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts or refreshes a corporation from its ESI representation.
    pub async fn upsert(
        &self,
        corporation_id: i64,
        corporation: &CorporationInfo,
    ) -> Result<entity::eve_corporation::Model, DbErr> {
        let model = entity::eve_corporation::ActiveModel {
            corporation_id: ActiveValue::Set(corporation_id),
            name: ActiveValue::Set(corporation.name.clone()),
            ticker: ActiveValue::Set(corporation.ticker.clone()),
            alliance_id: ActiveValue::Set(corporation.alliance_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        entity::prelude::EveCorporation::insert(model)
            .on_conflict(
                OnConflict::column(entity::eve_corporation::Column::CorporationId)
                    .update_columns([
                        entity::eve_corporation::Column::Name,
                        entity::eve_corporation::Column::Ticker,
                        entity::eve_corporation::Column::AllianceId,
                        entity::eve_corporation::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await
    }

    pub async fn get_by_corporation_id(
        &self,
        corporation_id: i64,
    ) -> Result<Option<entity::eve_corporation::Model>, DbErr> {
        entity::prelude::EveCorporation::find_by_id(corporation_id)
            .one(self.db)
            .await
    }

    pub async fn get_by_corporation_ids(
        &self,
        corporation_ids: &[i64],
    ) -> Result<Vec<entity::eve_corporation::Model>, DbErr> {
        entity::prelude::EveCorporation::find()
            .filter(
                entity::eve_corporation::Column::CorporationId
                    .is_in(corporation_ids.iter().copied()),
            )
            .all(self.db)
            .await
    }

    /// Alliance IDs of the given corporations, deduplicated, skipping
    /// corporations outside any alliance.
    pub async fn get_alliance_ids(&self, corporation_ids: &[i64]) -> Result<Vec<i64>, DbErr> {
        entity::prelude::EveCorporation::find()
            .select_only()
            .column(entity::eve_corporation::Column::AllianceId)
            .distinct()
            .filter(
                entity::eve_corporation::Column::CorporationId
                    .is_in(corporation_ids.iter().copied()),
            )
            .filter(entity::eve_corporation::Column::AllianceId.is_not_null())
            .into_tuple::<Option<i64>>()
            .all(self.db)
            .await
            .map(|ids| ids.into_iter().flatten().collect())
    }

    /// IDs of every known corporation belonging to one of the given alliances.
    pub async fn get_corporation_ids_in_alliances(
        &self,
        alliance_ids: &[i64],
    ) -> Result<Vec<i64>, DbErr> {
        entity::prelude::EveCorporation::find()
            .select_only()
            .column(entity::eve_corporation::Column::CorporationId)
            .filter(
                entity::eve_corporation::Column::AllianceId.is_in(alliance_ids.iter().copied()),
            )
            .into_tuple::<i64>()
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Schema};

    use crate::data::eve::corporation::CorporationRepository;
    use crate::util::test::{mock::mock_corporation_info, setup::test_setup};

    async fn setup() -> Result<DatabaseConnection, DbErr> {
        let test = test_setup().await;

        let db = test.db;
        let schema = Schema::new(DbBackend::Sqlite);

        let stmts = vec![schema.create_table_from_entity(entity::prelude::EveCorporation)];

        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        Ok(db)
    }

    /// Should succeed when inserting a new corporation
    #[tokio::test]
    async fn upsert_inserts_new_corporation() -> Result<(), DbErr> {
        let db = setup().await?;
        let repo = CorporationRepository::new(&db);

        let corporation = repo
            .upsert(2001, &mock_corporation_info(Some(3001)))
            .await?;

        assert_eq!(corporation.corporation_id, 2001);
        assert_eq!(corporation.alliance_id, Some(3001));

        Ok(())
    }

    /// Should update fields in place when the corporation already exists
    #[tokio::test]
    async fn upsert_refreshes_existing_corporation() -> Result<(), DbErr> {
        let db = setup().await?;
        let repo = CorporationRepository::new(&db);

        repo.upsert(2001, &mock_corporation_info(Some(3001))).await?;

        let mut updated = mock_corporation_info(None);
        updated.name = "Reborn Industries".to_string();
        let corporation = repo.upsert(2001, &updated).await?;

        assert_eq!(corporation.name, "Reborn Industries");
        assert_eq!(corporation.alliance_id, None);

        let all = repo.get_by_corporation_ids(&[2001]).await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    /// Alliance widening helpers should ignore unallied corporations
    #[tokio::test]
    async fn alliance_lookups_skip_unallied_corporations() -> Result<(), DbErr> {
        let db = setup().await?;
        let repo = CorporationRepository::new(&db);

        repo.upsert(2001, &mock_corporation_info(Some(3001))).await?;
        repo.upsert(2002, &mock_corporation_info(Some(3001))).await?;
        repo.upsert(2003, &mock_corporation_info(None)).await?;

        let alliance_ids = repo.get_alliance_ids(&[2001, 2003]).await?;
        assert_eq!(alliance_ids, vec![3001]);

        let mut members = repo.get_corporation_ids_in_alliances(&alliance_ids).await?;
        members.sort();
        assert_eq!(members, vec![2001, 2002]);

        Ok(())
    }
}
