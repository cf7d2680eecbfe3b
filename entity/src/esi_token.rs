use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "esi_token")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_character_id: i32,
    #[sea_orm(column_type = "Text")]
    pub access_token: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub refresh_token: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub scopes: String,
    pub expires_at: DateTime,
    pub created_at: DateTime,
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
}

impl Related<super::user_character::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCharacter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
