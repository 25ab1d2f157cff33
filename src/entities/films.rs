use sea_orm::entity::prelude::*;

/// Shared catalog entry. Names are unique across all users.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "films")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_films::Entity")]
    UserFilms,
}

impl Related<super::user_films::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserFilms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
