use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "location")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub eve_solar_system_id: Option<i64>,
    pub eve_type_id: Option<i64>,
    pub owner_corporation_id: Option<i64>,
    pub updated_at: DateTime,
}

impl Model {
    /// A row resolved to nothing at all, usually the leftovers of a
    /// failed structure lookup.
    pub fn is_empty(&self) -> bool {
        self.eve_solar_system_id.is_none() && self.eve_type_id.is_none() && self.parent_id.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "super::eve_solar_system::Entity",
        from = "Column::EveSolarSystemId",
        to = "super::eve_solar_system::Column::SolarSystemId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    EveSolarSystem,
    #[sea_orm(
        belongs_to = "super::eve_type::Entity",
        from = "Column::EveTypeId",
        to = "super::eve_type::Column::TypeId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    EveType,
    #[sea_orm(has_many = "super::blueprint::Entity")]
    Blueprint,
}

impl Related<super::eve_solar_system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EveSolarSystem.def()
    }
}

impl Related<super::eve_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EveType.def()
    }
}

impl Related<super::blueprint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blueprint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
