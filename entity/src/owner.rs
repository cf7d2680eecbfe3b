use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "owner")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_character_id: i32,
    #[sea_orm(unique, nullable)]
    pub corporation_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    /// Corporate owners sync corporation endpoints, personal owners
    /// sync the character's own endpoints.
    pub fn is_corporate(&self) -> bool {
        self.corporation_id.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_character::Entity",
        from = "Column::UserCharacterId",
        to = "super::user_character::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UserCharacter,
    #[sea_orm(
        belongs_to = "super::eve_corporation::Entity",
        from = "Column::CorporationId",
        to = "super::eve_corporation::Column::CorporationId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    EveCorporation,
    #[sea_orm(has_many = "super::blueprint::Entity")]
    Blueprint,
    #[sea_orm(has_many = "super::industry_job::Entity")]
    IndustryJob,
}

impl Related<super::user_character::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCharacter.def()
    }
}

impl Related<super::eve_corporation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EveCorporation.def()
    }
}

impl Related<super::blueprint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blueprint.def()
    }
}

impl Related<super::industry_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IndustryJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
