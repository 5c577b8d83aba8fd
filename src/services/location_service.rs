//! Location and sublocation management.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    Location, LocationChanges, LocationWithSublocations, NewLocation, Sublocation,
    SublocationDetails,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait LocationService: Send + Sync {
    async fn list_locations(&self) -> AppResult<Vec<LocationWithSublocations>>;

    async fn get_location(&self, id: i32) -> AppResult<LocationWithSublocations>;

    async fn create_location(&self, location: NewLocation) -> AppResult<Location>;

    async fn update_location(&self, id: i32, changes: LocationChanges) -> AppResult<Location>;

    /// Delete locations (cascading to their sublocations and permits)
    async fn delete_locations(&self, ids: Vec<i32>) -> AppResult<u64>;

    async fn list_sublocations(&self) -> AppResult<Vec<SublocationDetails>>;

    async fn get_sublocation(&self, id: i32) -> AppResult<SublocationDetails>;

    async fn create_sublocation(&self, name: String, location_id: i32) -> AppResult<Sublocation>;

    async fn update_sublocation(&self, id: i32, name: String) -> AppResult<Sublocation>;

    async fn delete_sublocation(&self, id: i32) -> AppResult<()>;
}

pub struct LocationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> LocationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> LocationService for LocationManager<U> {
    async fn list_locations(&self) -> AppResult<Vec<LocationWithSublocations>> {
        self.uow.locations().list_with_sublocations().await
    }

    async fn get_location(&self, id: i32) -> AppResult<LocationWithSublocations> {
        self.uow
            .locations()
            .find_with_sublocations(id)
            .await?
            .ok_or_not_found("location")
    }

    async fn create_location(&self, location: NewLocation) -> AppResult<Location> {
        let location = self.uow.locations().create(location).await?;
        tracing::info!(location_id = location.id, name = %location.name, "Location created");
        Ok(location)
    }

    async fn update_location(&self, id: i32, changes: LocationChanges) -> AppResult<Location> {
        self.uow.locations().update(id, changes).await
    }

    async fn delete_locations(&self, ids: Vec<i32>) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::validation("Please select at least one location"));
        }

        let deleted = self.uow.locations().delete_many(ids).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("location"));
        }

        tracing::info!(deleted, "Locations deleted");
        Ok(deleted)
    }

    async fn list_sublocations(&self) -> AppResult<Vec<SublocationDetails>> {
        self.uow.sublocations().list_details().await
    }

    async fn get_sublocation(&self, id: i32) -> AppResult<SublocationDetails> {
        self.uow
            .sublocations()
            .find_details(id)
            .await?
            .ok_or_not_found("sublocation")
    }

    async fn create_sublocation(&self, name: String, location_id: i32) -> AppResult<Sublocation> {
        self.uow
            .locations()
            .find_by_id(location_id)
            .await?
            .ok_or_not_found("location")?;

        self.uow.sublocations().create(name, location_id).await
    }

    async fn update_sublocation(&self, id: i32, name: String) -> AppResult<Sublocation> {
        self.uow.sublocations().update(id, name).await
    }

    async fn delete_sublocation(&self, id: i32) -> AppResult<()> {
        self.uow.sublocations().delete(id).await
    }
}
