use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "blueprint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: i64,
    pub owner_id: i32,
    pub eve_type_id: i64,
    pub location_id: i64,
    pub location_flag: String,
    pub quantity: i32,
    pub runs: Option<i32>,
    pub material_efficiency: i32,
    pub time_efficiency: i32,
}

impl Model {
    /// Originals have unlimited runs, copies carry a finite run count.
    pub fn is_original(&self) -> bool {
        self.runs.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::owner::Entity",
        from = "Column::OwnerId",
        to = "super::owner::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::eve_type::Entity",
        from = "Column::EveTypeId",
        to = "super::eve_type::Column::TypeId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    EveType,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Location,
    #[sea_orm(has_many = "super::request::Entity")]
    Request,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::eve_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EveType.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
