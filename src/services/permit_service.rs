//! Permit service - issuing permits and permit administration.
//!
//! Issuing runs the eligibility policy against the plate's history inside
//! the Unit of Work's atomic `record_permit`, so the decision and the insert
//! see the same data.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::domain::{
    normalize_plate, Location, PermitChanges, PermitDetails, PermitPolicy, PermitRequest,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait PermitService: Send + Sync {
    /// Evaluate a request at `requested_at` (local time) and issue the permit
    async fn create_permit(
        &self,
        request: PermitRequest,
        requested_at: NaiveDateTime,
    ) -> AppResult<PermitDetails>;

    /// Every permit, newest first
    async fn list_permits(&self) -> AppResult<Vec<PermitDetails>>;

    /// Permits owned by `user_id`, newest first
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<PermitDetails>>;

    async fn get_permit(&self, id: i32) -> AppResult<PermitDetails>;

    /// Admin edit; may move expiry explicitly
    async fn update_permit(&self, id: i32, changes: PermitChanges) -> AppResult<PermitDetails>;

    async fn delete_permits(&self, ids: Vec<i32>) -> AppResult<u64>;
}

pub struct PermitManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PermitManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn location(&self, id: i32) -> AppResult<Location> {
        self.uow
            .locations()
            .find_by_id(id)
            .await?
            .ok_or_not_found("location")
    }

    async fn ensure_user_exists(&self, user_id: i32) -> AppResult<()> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("user")
            .map(|_| ())
    }

    /// A sublocation must exist and sit inside `location_id`.
    async fn ensure_sublocation_in(&self, sublocation_id: i32, location_id: i32) -> AppResult<()> {
        match self.uow.sublocations().find_by_id(sublocation_id).await? {
            Some(sublocation) if sublocation.location_id == location_id => Ok(()),
            _ => Err(AppError::invalid_field(
                "sublocation",
                "Sublocation does not belong to this location",
            )),
        }
    }

    async fn details(&self, id: i32) -> AppResult<PermitDetails> {
        self.uow
            .permits()
            .find_details(id)
            .await?
            .ok_or_not_found("permit")
    }
}

#[async_trait]
impl<U: UnitOfWork> PermitService for PermitManager<U> {
    async fn create_permit(
        &self,
        request: PermitRequest,
        requested_at: NaiveDateTime,
    ) -> AppResult<PermitDetails> {
        let location = self.location(request.location_id).await?;

        if let Some(user_id) = request.user_id {
            self.ensure_user_exists(user_id).await?;
        }
        if let Some(sublocation_id) = request.sublocation_id {
            self.ensure_sublocation_in(sublocation_id, location.id).await?;
        }

        let plate = normalize_plate(&request.vplate);
        if plate.is_empty() {
            return Err(AppError::invalid_field(
                "vplate",
                "please enter your vehicle's plate number",
            ));
        }

        let policy = PermitPolicy::new(&location);
        let duration = request.duration;
        let outcome = self
            .uow
            .record_permit(&plate, |prior| {
                let exp_date = policy.evaluate(&plate, prior, duration, requested_at)?;
                Ok(request.into_new_permit(exp_date))
            })
            .await;

        let permit = match outcome {
            Ok(permit) => permit,
            Err(AppError::Permit(rejection)) => {
                tracing::warn!(plate = %plate, location_id = location.id, "Permit rejected: {}", rejection);
                return Err(rejection.into());
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            permit_id = permit.id,
            plate = %permit.vplate,
            location_id = permit.location_id,
            duration = permit.duration,
            exp_date = %permit.exp_date,
            "Permit issued"
        );

        self.details(permit.id).await
    }

    async fn list_permits(&self) -> AppResult<Vec<PermitDetails>> {
        self.uow.permits().list_details().await
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<PermitDetails>> {
        self.uow.permits().list_for_user(user_id).await
    }

    async fn get_permit(&self, id: i32) -> AppResult<PermitDetails> {
        self.details(id).await
    }

    async fn update_permit(&self, id: i32, changes: PermitChanges) -> AppResult<PermitDetails> {
        let current = self
            .uow
            .permits()
            .find_by_id(id)
            .await?
            .ok_or_not_found("permit")?;

        if changes.duration.is_some_and(|d| d < 0) {
            return Err(AppError::invalid_field("duration", "Duration cannot be negative"));
        }

        let location_id = match changes.location_id {
            Some(location_id) => self.location(location_id).await?.id,
            None => current.location_id,
        };
        // A kept sublocation must follow the permit to its new location.
        let sublocation_id = match changes.sublocation_id {
            Some(id) => Some(id),
            None if location_id != current.location_id => current.sublocation_id,
            None => None,
        };
        if let Some(sublocation_id) = sublocation_id {
            self.ensure_sublocation_in(sublocation_id, location_id).await?;
        }

        let changes = PermitChanges {
            vplate: changes.vplate.as_deref().map(normalize_plate),
            ..changes
        };
        if changes.vplate.as_deref().is_some_and(str::is_empty) {
            return Err(AppError::invalid_field(
                "vplate",
                "please enter your vehicle's plate number",
            ));
        }

        self.uow.permits().update(id, changes).await?;
        tracing::info!(permit_id = id, "Permit updated");

        self.details(id).await
    }

    async fn delete_permits(&self, ids: Vec<i32>) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::validation("Please select at least one permit"));
        }

        let deleted = self.uow.permits().delete_many(ids).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("permit"));
        }

        tracing::info!(deleted, "Permits deleted");
        Ok(deleted)
    }
}
