//! Sublocation database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Sublocation;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sublocations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub location_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Location,
    #[sea_orm(has_many = "super::permit::Entity")]
    Permits,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::permit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sublocation {
    fn from(model: Model) -> Self {
        Sublocation {
            id: model.id,
            name: model.name,
            location_id: model.location_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
