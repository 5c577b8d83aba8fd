//! Location database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Location;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub max_form_duration: i32,
    pub max_monthly_duration: i32,
    pub curfew_reset: Time,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sublocation::Entity")]
    Sublocations,
    #[sea_orm(has_many = "super::permit::Entity")]
    Permits,
}

impl Related<super::sublocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sublocations.def()
    }
}

impl Related<super::permit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Location {
    fn from(model: Model) -> Self {
        Location {
            id: model.id,
            name: model.name,
            max_form_duration: model.max_form_duration,
            max_monthly_duration: model.max_monthly_duration,
            curfew_reset: model.curfew_reset,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
