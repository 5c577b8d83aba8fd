//! Sublocation repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryOrder, Set};

use super::entities::location;
use super::entities::sublocation::{self, ActiveModel, Entity as SublocationEntity};
use crate::domain::{Location, Sublocation, SublocationDetails};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SublocationRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Sublocation>>;

    /// Sublocation with its location embedded
    async fn find_details(&self, id: i32) -> AppResult<Option<SublocationDetails>>;

    async fn list_details(&self) -> AppResult<Vec<SublocationDetails>>;

    async fn create(&self, name: String, location_id: i32) -> AppResult<Sublocation>;

    async fn update(&self, id: i32, name: String) -> AppResult<Sublocation>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct SublocationStore {
    db: DatabaseConnection,
}

impl SublocationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_location(
        &self,
        models: Vec<sublocation::Model>,
    ) -> AppResult<Vec<SublocationDetails>> {
        let locations = models.load_one(location::Entity, &self.db).await?;

        Ok(models
            .into_iter()
            .zip(locations)
            .map(|(model, location)| SublocationDetails {
                sublocation: Sublocation::from(model),
                location: location.map(Location::from),
            })
            .collect())
    }
}

#[async_trait]
impl SublocationRepository for SublocationStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Sublocation>> {
        let result = SublocationEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Sublocation::from))
    }

    async fn find_details(&self, id: i32) -> AppResult<Option<SublocationDetails>> {
        let Some(model) = SublocationEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        Ok(self.with_location(vec![model]).await?.pop())
    }

    async fn list_details(&self) -> AppResult<Vec<SublocationDetails>> {
        let models = SublocationEntity::find()
            .order_by_asc(sublocation::Column::Name)
            .all(&self.db)
            .await?;

        self.with_location(models).await
    }

    async fn create(&self, name: String, location_id: i32) -> AppResult<Sublocation> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(name),
            location_id: Set(location_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Sublocation::from(model))
    }

    async fn update(&self, id: i32, name: String) -> AppResult<Sublocation> {
        let mut active: ActiveModel = SublocationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("sublocation")?
            .into();

        active.name = Set(name);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Sublocation::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = SublocationEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("sublocation"));
        }

        Ok(())
    }
}
