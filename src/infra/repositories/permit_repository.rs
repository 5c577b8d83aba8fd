//! Permit repository implementation.
//!
//! The plate lookup and the insert are also exposed as free functions over
//! any `ConnectionTrait`, so the Unit of Work can run them inside its own
//! transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    QueryFilter, QueryOrder, Set,
};

use super::entities::permit::{self, ActiveModel, Entity as PermitEntity};
use super::entities::{location, sublocation, user};
use crate::domain::{
    Location, NewPermit, Permit, PermitChanges, PermitDetails, Sublocation, User, UserResponse,
};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PermitRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Permit>>;

    /// Permit with location, sublocation and user embedded
    async fn find_details(&self, id: i32) -> AppResult<Option<PermitDetails>>;

    /// Every permit of a plate, newest first
    async fn find_by_plate(&self, plate: &str) -> AppResult<Vec<Permit>>;

    /// All permits newest first, with relations embedded
    async fn list_details(&self) -> AppResult<Vec<PermitDetails>>;

    /// Permits owned by one user, newest first
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<PermitDetails>>;

    async fn update(&self, id: i32, changes: PermitChanges) -> AppResult<Permit>;

    /// Delete the listed ids and return how many rows went away
    async fn delete_many(&self, ids: Vec<i32>) -> AppResult<u64>;
}

pub struct PermitStore {
    db: DatabaseConnection,
}

impl PermitStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Every permit of `plate`, newest first; ties go to the higher id.
pub(crate) async fn find_by_plate<C: ConnectionTrait>(
    conn: &C,
    plate: &str,
) -> AppResult<Vec<Permit>> {
    let models = PermitEntity::find()
        .filter(permit::Column::Vplate.eq(plate))
        .order_by_desc(permit::Column::CreatedAt)
        .order_by_desc(permit::Column::Id)
        .all(conn)
        .await?;

    Ok(models.into_iter().map(Permit::from).collect())
}

pub(crate) async fn insert_permit<C: ConnectionTrait>(
    conn: &C,
    new_permit: NewPermit,
) -> AppResult<Permit> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        vplate: Set(new_permit.vplate),
        vmake: Set(new_permit.vmake),
        vmodel: Set(new_permit.vmodel),
        vcolor: Set(new_permit.vcolor),
        user_id: Set(new_permit.user_id),
        location_id: Set(new_permit.location_id),
        sublocation_id: Set(new_permit.sublocation_id),
        unit: Set(new_permit.unit),
        email: Set(new_permit.email),
        phone: Set(new_permit.phone),
        first_name: Set(new_permit.first_name),
        last_name: Set(new_permit.last_name),
        duration: Set(new_permit.duration),
        exp_date: Set(new_permit.exp_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active_model.insert(conn).await?;
    Ok(Permit::from(model))
}

async fn with_details<C: ConnectionTrait>(
    conn: &C,
    models: Vec<permit::Model>,
) -> AppResult<Vec<PermitDetails>> {
    let locations = models.load_one(location::Entity, conn).await?;
    let sublocations = models.load_one(sublocation::Entity, conn).await?;
    let users = models.load_one(user::Entity, conn).await?;

    Ok(models
        .into_iter()
        .zip(locations)
        .zip(sublocations)
        .zip(users)
        .map(|(((model, location), sublocation), user)| PermitDetails {
            permit: Permit::from(model),
            location: location.map(Location::from),
            sublocation: sublocation.map(Sublocation::from),
            user: user.map(|u| UserResponse::from(User::from(u))),
        })
        .collect())
}

#[async_trait]
impl PermitRepository for PermitStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Permit>> {
        let result = PermitEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Permit::from))
    }

    async fn find_details(&self, id: i32) -> AppResult<Option<PermitDetails>> {
        let Some(model) = PermitEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        Ok(with_details(&self.db, vec![model]).await?.pop())
    }

    async fn find_by_plate(&self, plate: &str) -> AppResult<Vec<Permit>> {
        find_by_plate(&self.db, plate).await
    }

    async fn list_details(&self) -> AppResult<Vec<PermitDetails>> {
        let models = PermitEntity::find()
            .order_by_desc(permit::Column::CreatedAt)
            .order_by_desc(permit::Column::Id)
            .all(&self.db)
            .await?;

        with_details(&self.db, models).await
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<PermitDetails>> {
        let models = PermitEntity::find()
            .filter(permit::Column::UserId.eq(user_id))
            .order_by_desc(permit::Column::CreatedAt)
            .order_by_desc(permit::Column::Id)
            .all(&self.db)
            .await?;

        with_details(&self.db, models).await
    }

    async fn update(&self, id: i32, changes: PermitChanges) -> AppResult<Permit> {
        let mut active: ActiveModel = PermitEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("permit")?
            .into();

        if let Some(vplate) = changes.vplate {
            active.vplate = Set(vplate);
        }
        if let Some(vmake) = changes.vmake {
            active.vmake = Set(Some(vmake));
        }
        if let Some(vmodel) = changes.vmodel {
            active.vmodel = Set(Some(vmodel));
        }
        if let Some(vcolor) = changes.vcolor {
            active.vcolor = Set(Some(vcolor));
        }
        if let Some(location_id) = changes.location_id {
            active.location_id = Set(location_id);
        }
        if let Some(sublocation_id) = changes.sublocation_id {
            active.sublocation_id = Set(Some(sublocation_id));
        }
        if let Some(unit) = changes.unit {
            active.unit = Set(Some(unit));
        }
        if let Some(email) = changes.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(Some(last_name));
        }
        if let Some(duration) = changes.duration {
            active.duration = Set(duration);
        }
        if let Some(exp_date) = changes.exp_date {
            active.exp_date = Set(exp_date);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Permit::from(model))
    }

    async fn delete_many(&self, ids: Vec<i32>) -> AppResult<u64> {
        let result = PermitEntity::delete_many()
            .filter(permit::Column::Id.is_in(ids))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
