//! Permit database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Permit;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "permits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vplate: String,
    pub vmake: Option<String>,
    pub vmodel: Option<String>,
    pub vcolor: Option<String>,
    pub user_id: Option<i32>,
    pub location_id: i32,
    pub sublocation_id: Option<i32>,
    pub unit: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub duration: i32,
    /// Local wall-clock expiry, no time zone
    pub exp_date: DateTime,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::sublocation::Entity",
        from = "Column::SublocationId",
        to = "super::sublocation::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Sublocation,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::sublocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sublocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Permit {
    fn from(model: Model) -> Self {
        Permit {
            id: model.id,
            vplate: model.vplate,
            vmake: model.vmake,
            vmodel: model.vmodel,
            vcolor: model.vcolor,
            user_id: model.user_id,
            location_id: model.location_id,
            sublocation_id: model.sublocation_id,
            unit: model.unit,
            email: model.email,
            phone: model.phone,
            first_name: model.first_name,
            last_name: model.last_name,
            duration: model.duration,
            exp_date: model.exp_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
