//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the one multi-step write that
//! must be atomic: reading a plate's permit history and inserting the next
//! permit.

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, DbErr, IsolationLevel, TransactionTrait};
use std::sync::Arc;

use super::repositories::{
    find_by_plate, insert_permit, LocationRepository, LocationStore, PermitRepository,
    PermitStore, SublocationRepository, SublocationStore, UserRepository, UserStore,
};
use crate::domain::{NewPermit, Permit};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use super::repositories::{
    MockLocationRepository, MockPermitRepository, MockSublocationRepository, MockUserRepository,
};

pub(crate) const PERMIT_RACE_MESSAGE: &str =
    "another permit request for this plate is in progress";

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because `record_permit` is generic; tests supply
/// an in-memory implementation instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn locations(&self) -> Arc<dyn LocationRepository>;

    fn sublocations(&self) -> Arc<dyn SublocationRepository>;

    fn permits(&self) -> Arc<dyn PermitRepository>;

    /// Read every permit of `plate` (newest first), let `decide` turn that
    /// history into the permit to insert, and insert it, all atomically.
    ///
    /// Two concurrent calls for the same plate never both insert.
    async fn record_permit<F>(&self, plate: &str, decide: F) -> AppResult<Permit>
    where
        F: FnOnce(&[Permit]) -> AppResult<NewPermit> + Send;
}

/// SeaORM-backed UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    location_repo: Arc<LocationStore>,
    sublocation_repo: Arc<SublocationStore>,
    permit_repo: Arc<PermitStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            location_repo: Arc::new(LocationStore::new(db.clone())),
            sublocation_repo: Arc::new(SublocationStore::new(db.clone())),
            permit_repo: Arc::new(PermitStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn locations(&self) -> Arc<dyn LocationRepository> {
        self.location_repo.clone()
    }

    fn sublocations(&self) -> Arc<dyn SublocationRepository> {
        self.sublocation_repo.clone()
    }

    fn permits(&self) -> Arc<dyn PermitRepository> {
        self.permit_repo.clone()
    }

    async fn record_permit<F>(&self, plate: &str, decide: F) -> AppResult<Permit>
    where
        F: FnOnce(&[Permit]) -> AppResult<NewPermit> + Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::Serializable),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(serialization_conflict)?;

        let outcome = async {
            let prior = find_by_plate(&txn, plate).await?;
            let new_permit = decide(&prior)?;
            insert_permit(&txn, new_permit).await
        }
        .await;

        match outcome {
            Ok(permit) => {
                txn.commit().await.map_err(serialization_conflict)?;
                Ok(permit)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(match e {
                    AppError::Database(db_err) => serialization_conflict(db_err),
                    other => other,
                })
            }
        }
    }
}

/// Unit of Work over mockall repositories for service unit tests.
///
/// `record_permit` reads history through the permit mock's `find_by_plate`
/// and numbers the inserted permit after it.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockUnitOfWork {
    pub users: Arc<MockUserRepository>,
    pub locations: Arc<MockLocationRepository>,
    pub sublocations: Arc<MockSublocationRepository>,
    pub permits: Arc<MockPermitRepository>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockUnitOfWork {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            locations: Arc::new(MockLocationRepository::new()),
            sublocations: Arc::new(MockSublocationRepository::new()),
            permits: Arc::new(MockPermitRepository::new()),
        }
    }

    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_locations(mut self, repo: MockLocationRepository) -> Self {
        self.locations = Arc::new(repo);
        self
    }

    pub fn with_sublocations(mut self, repo: MockSublocationRepository) -> Self {
        self.sublocations = Arc::new(repo);
        self
    }

    pub fn with_permits(mut self, repo: MockPermitRepository) -> Self {
        self.permits = Arc::new(repo);
        self
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockUnitOfWork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl UnitOfWork for MockUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn locations(&self) -> Arc<dyn LocationRepository> {
        self.locations.clone()
    }

    fn sublocations(&self) -> Arc<dyn SublocationRepository> {
        self.sublocations.clone()
    }

    fn permits(&self) -> Arc<dyn PermitRepository> {
        self.permits.clone()
    }

    async fn record_permit<F>(&self, plate: &str, decide: F) -> AppResult<Permit>
    where
        F: FnOnce(&[Permit]) -> AppResult<NewPermit> + Send,
    {
        let prior = self.permits.find_by_plate(plate).await?;
        let next_id = prior.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let new_permit = decide(&prior)?;
        Ok(new_permit.into_permit(next_id, chrono::Utc::now()))
    }
}

/// Postgres aborts one side of a serializable conflict with SQLSTATE 40001.
fn serialization_conflict(err: DbErr) -> AppError {
    if is_serialization_failure(&err) {
        tracing::warn!("Concurrent permit request aborted: {}", err);
        AppError::conflict(PERMIT_RACE_MESSAGE)
    } else {
        AppError::from(err)
    }
}

fn is_serialization_failure(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("could not serialize") || message.contains("40001")
}
