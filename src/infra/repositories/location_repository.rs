//! Location repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, Set,
};

use super::conflict_on_unique;
use super::entities::location::{self, ActiveModel, Entity as LocationEntity};
use super::entities::sublocation;
use crate::domain::{Location, LocationChanges, LocationWithSublocations, NewLocation, Sublocation};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const NAME_TAKEN: &str = "A location with this name already exists";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Location>>;

    /// Location with its sublocations embedded
    async fn find_with_sublocations(&self, id: i32) -> AppResult<Option<LocationWithSublocations>>;

    /// All locations by name, each with its sublocations
    async fn list_with_sublocations(&self) -> AppResult<Vec<LocationWithSublocations>>;

    async fn create(&self, location: NewLocation) -> AppResult<Location>;

    async fn update(&self, id: i32, changes: LocationChanges) -> AppResult<Location>;

    /// Delete the listed ids and return how many rows went away
    async fn delete_many(&self, ids: Vec<i32>) -> AppResult<u64>;
}

pub struct LocationStore {
    db: DatabaseConnection,
}

impl LocationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_sublocations(
        &self,
        models: Vec<location::Model>,
    ) -> AppResult<Vec<LocationWithSublocations>> {
        let sublocations = models.load_many(sublocation::Entity, &self.db).await?;

        Ok(models
            .into_iter()
            .zip(sublocations)
            .map(|(model, subs)| LocationWithSublocations {
                location: Location::from(model),
                sublocations: subs.into_iter().map(Sublocation::from).collect(),
            })
            .collect())
    }
}

#[async_trait]
impl LocationRepository for LocationStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Location>> {
        let result = LocationEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Location::from))
    }

    async fn find_with_sublocations(&self, id: i32) -> AppResult<Option<LocationWithSublocations>> {
        let Some(model) = LocationEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        Ok(self.with_sublocations(vec![model]).await?.pop())
    }

    async fn list_with_sublocations(&self) -> AppResult<Vec<LocationWithSublocations>> {
        let models = LocationEntity::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await?;

        self.with_sublocations(models).await
    }

    async fn create(&self, new_location: NewLocation) -> AppResult<Location> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(new_location.name),
            max_form_duration: Set(new_location.max_form_duration),
            max_monthly_duration: Set(new_location.max_monthly_duration),
            curfew_reset: Set(new_location.curfew_reset),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, NAME_TAKEN))?;

        Ok(Location::from(model))
    }

    async fn update(&self, id: i32, changes: LocationChanges) -> AppResult<Location> {
        let mut active: ActiveModel = LocationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("location")?
            .into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(max_form_duration) = changes.max_form_duration {
            active.max_form_duration = Set(max_form_duration);
        }
        if let Some(max_monthly_duration) = changes.max_monthly_duration {
            active.max_monthly_duration = Set(max_monthly_duration);
        }
        if let Some(curfew_reset) = changes.curfew_reset {
            active.curfew_reset = Set(curfew_reset);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, NAME_TAKEN))?;

        Ok(Location::from(model))
    }

    async fn delete_many(&self, ids: Vec<i32>) -> AppResult<u64> {
        let result = LocationEntity::delete_many()
            .filter(location::Column::Id.is_in(ids))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
