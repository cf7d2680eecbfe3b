use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::JobStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "industry_job")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub job_id: i64,
    pub owner_id: i32,
    #[sea_orm(unique)]
    pub blueprint_id: i64,
    pub activity: i32,
    pub installer_id: i64,
    pub location_id: i64,
    pub runs: i32,
    pub start_date: DateTime,
    pub end_date: DateTime,
    pub status: JobStatus,
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
        belongs_to = "super::blueprint::Entity",
        from = "Column::BlueprintId",
        to = "super::blueprint::Column::ItemId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Blueprint,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::blueprint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blueprint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
