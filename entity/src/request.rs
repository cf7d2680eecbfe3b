use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::RequestStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub blueprint_id: i64,
    pub requesting_user_id: i32,
    pub fulfilling_user_id: Option<i32>,
    pub runs: Option<i32>,
    pub status: RequestStatus,
    pub created_at: DateTime,
    pub closed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blueprint::Entity",
        from = "Column::BlueprintId",
        to = "super::blueprint::Column::ItemId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Blueprint,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequestingUserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    RequestingUser,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FulfillingUserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    FulfillingUser,
}

impl Related<super::blueprint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blueprint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
