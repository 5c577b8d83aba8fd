//! Shared fixtures for integration tests.
//!
//! `MemoryUnitOfWork` keeps every table in one mutex-guarded store and
//! mirrors the PostgreSQL schema's cascades, so services and the router can
//! be driven end to end without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use parking_permits::config::Config;
use parking_permits::domain::{
    default_curfew_reset, Location, LocationChanges, LocationWithSublocations, NewLocation,
    NewPermit, NewUser, Password, Permit, PermitChanges, PermitDetails, Sublocation,
    SublocationDetails, User, UserChanges, UserRole,
};
use parking_permits::errors::{AppError, AppResult};
use parking_permits::infra::{
    LocationRepository, PermitRepository, SublocationRepository, UnitOfWork, UserRepository,
};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

pub fn test_config() -> Config {
    Config::new("postgres://localhost/unused", TEST_SECRET).unwrap()
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

#[derive(Default)]
struct Tables {
    last_id: i32,
    users: Vec<User>,
    locations: Vec<Location>,
    sublocations: Vec<Sublocation>,
    permits: Vec<Permit>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn location(&self, id: i32) -> Option<Location> {
        self.locations.iter().find(|l| l.id == id).cloned()
    }

    fn sublocation(&self, id: i32) -> Option<Sublocation> {
        self.sublocations.iter().find(|s| s.id == id).cloned()
    }

    fn user(&self, id: i32) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    fn with_sublocations(&self, location: Location) -> LocationWithSublocations {
        let sublocations = self
            .sublocations
            .iter()
            .filter(|s| s.location_id == location.id)
            .cloned()
            .collect();
        LocationWithSublocations {
            location,
            sublocations,
        }
    }

    fn details(&self, permit: Permit) -> PermitDetails {
        PermitDetails {
            location: self.location(permit.location_id),
            sublocation: permit.sublocation_id.and_then(|id| self.sublocation(id)),
            user: permit.user_id.and_then(|id| self.user(id)).map(Into::into),
            permit,
        }
    }

    /// Newest first, ties broken by id
    fn newest_first(&self, mut permits: Vec<Permit>) -> Vec<Permit> {
        permits.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        permits
    }

    fn plate_history(&self, plate: &str) -> Vec<Permit> {
        let permits = self
            .permits
            .iter()
            .filter(|p| p.vplate == plate)
            .cloned()
            .collect();
        self.newest_first(permits)
    }

    fn insert_permit(&mut self, permit: NewPermit, created_at: DateTime<Utc>) -> Permit {
        let id = self.next_id();
        let permit = permit.into_permit(id, created_at);
        self.permits.push(permit.clone());
        permit
    }
}

/// In-memory store shared by every repository handle.
#[derive(Clone, Default)]
pub struct MemoryUnitOfWork {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn add_location(&self, name: &str, max_monthly_duration: i32) -> Location {
        let mut tables = self.lock();
        let now = Utc::now();
        let location = Location {
            id: tables.next_id(),
            name: name.into(),
            max_form_duration: 31,
            max_monthly_duration,
            curfew_reset: default_curfew_reset(),
            created_at: now,
            updated_at: now,
        };
        tables.locations.push(location.clone());
        location
    }

    pub fn add_sublocation(&self, name: &str, location_id: i32) -> Sublocation {
        let mut tables = self.lock();
        let now = Utc::now();
        let sublocation = Sublocation {
            id: tables.next_id(),
            name: name.into(),
            location_id,
            created_at: now,
            updated_at: now,
        };
        tables.sublocations.push(sublocation.clone());
        sublocation
    }

    pub fn add_user(&self, email: &str, password: &str, role: UserRole) -> User {
        let mut tables = self.lock();
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            first_name: "Test".into(),
            last_name: "User".into(),
            email: email.into(),
            default_phone: None,
            role,
            password_hash: Password::new(password).unwrap().into_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        user
    }

    /// Seed a historical permit for `plate`, created `age_days` ago.
    pub fn add_permit(
        &self,
        plate: &str,
        location_id: i32,
        duration: i32,
        exp_date: NaiveDateTime,
        age_days: i64,
    ) -> Permit {
        let permit = NewPermit {
            vplate: plate.into(),
            vmake: None,
            vmodel: None,
            vcolor: None,
            user_id: None,
            location_id,
            sublocation_id: None,
            unit: Some("1A".into()),
            email: None,
            phone: None,
            first_name: None,
            last_name: None,
            duration,
            exp_date,
        };
        self.lock()
            .insert_permit(permit, Utc::now() - Duration::days(age_days))
    }

    pub fn permit_count(&self) -> usize {
        self.lock().permits.len()
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    fn locations(&self) -> Arc<dyn LocationRepository> {
        Arc::new(self.clone())
    }

    fn sublocations(&self) -> Arc<dyn SublocationRepository> {
        Arc::new(self.clone())
    }

    fn permits(&self) -> Arc<dyn PermitRepository> {
        Arc::new(self.clone())
    }

    async fn record_permit<F>(&self, plate: &str, decide: F) -> AppResult<Permit>
    where
        F: FnOnce(&[Permit]) -> AppResult<NewPermit> + Send,
    {
        // Holding the lock across read and insert serializes requests.
        let mut tables = self.lock();
        let prior = tables.plate_history(plate);
        let permit = decide(&prior)?;
        Ok(tables.insert_permit(permit, Utc::now()))
    }
}

#[async_trait]
impl UserRepository for MemoryUnitOfWork {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.lock().user(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.lock().users.clone())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email is already taken"));
        }
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            default_phone: user.default_phone,
            role: user.role,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound("user"))?;
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(default_phone) = changes.default_phone {
            user.default_phone = default_phone;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<()> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound("user"))?;
        user.password_hash = password_hash;
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.lock();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(AppError::NotFound("user"));
        }
        for permit in tables.permits.iter_mut().filter(|p| p.user_id == Some(id)) {
            permit.user_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for MemoryUnitOfWork {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Location>> {
        Ok(self.lock().location(id))
    }

    async fn find_with_sublocations(&self, id: i32) -> AppResult<Option<LocationWithSublocations>> {
        let tables = self.lock();
        Ok(tables.location(id).map(|l| tables.with_sublocations(l)))
    }

    async fn list_with_sublocations(&self) -> AppResult<Vec<LocationWithSublocations>> {
        let tables = self.lock();
        let mut locations = tables.locations.clone();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations
            .into_iter()
            .map(|l| tables.with_sublocations(l))
            .collect())
    }

    async fn create(&self, location: NewLocation) -> AppResult<Location> {
        let mut tables = self.lock();
        if tables.locations.iter().any(|l| l.name == location.name) {
            return Err(AppError::conflict("Location name already exists"));
        }
        let now = Utc::now();
        let location = Location {
            id: tables.next_id(),
            name: location.name,
            max_form_duration: location.max_form_duration,
            max_monthly_duration: location.max_monthly_duration,
            curfew_reset: location.curfew_reset,
            created_at: now,
            updated_at: now,
        };
        tables.locations.push(location.clone());
        Ok(location)
    }

    async fn update(&self, id: i32, changes: LocationChanges) -> AppResult<Location> {
        let mut tables = self.lock();
        let location = tables
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(AppError::NotFound("location"))?;
        if let Some(name) = changes.name {
            location.name = name;
        }
        if let Some(max_form_duration) = changes.max_form_duration {
            location.max_form_duration = max_form_duration;
        }
        if let Some(max_monthly_duration) = changes.max_monthly_duration {
            location.max_monthly_duration = max_monthly_duration;
        }
        if let Some(curfew_reset) = changes.curfew_reset {
            location.curfew_reset = curfew_reset;
        }
        location.updated_at = Utc::now();
        Ok(location.clone())
    }

    async fn delete_many(&self, ids: Vec<i32>) -> AppResult<u64> {
        let mut tables = self.lock();
        let before = tables.locations.len();
        tables.locations.retain(|l| !ids.contains(&l.id));
        tables.sublocations.retain(|s| !ids.contains(&s.location_id));
        tables.permits.retain(|p| !ids.contains(&p.location_id));
        Ok((before - tables.locations.len()) as u64)
    }
}

#[async_trait]
impl SublocationRepository for MemoryUnitOfWork {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Sublocation>> {
        Ok(self.lock().sublocation(id))
    }

    async fn find_details(&self, id: i32) -> AppResult<Option<SublocationDetails>> {
        let tables = self.lock();
        Ok(tables.sublocation(id).map(|sublocation| SublocationDetails {
            location: tables.location(sublocation.location_id),
            sublocation,
        }))
    }

    async fn list_details(&self) -> AppResult<Vec<SublocationDetails>> {
        let tables = self.lock();
        Ok(tables
            .sublocations
            .iter()
            .cloned()
            .map(|sublocation| SublocationDetails {
                location: tables.location(sublocation.location_id),
                sublocation,
            })
            .collect())
    }

    async fn create(&self, name: String, location_id: i32) -> AppResult<Sublocation> {
        let mut tables = self.lock();
        let now = Utc::now();
        let sublocation = Sublocation {
            id: tables.next_id(),
            name,
            location_id,
            created_at: now,
            updated_at: now,
        };
        tables.sublocations.push(sublocation.clone());
        Ok(sublocation)
    }

    async fn update(&self, id: i32, name: String) -> AppResult<Sublocation> {
        let mut tables = self.lock();
        let sublocation = tables
            .sublocations
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::NotFound("sublocation"))?;
        sublocation.name = name;
        sublocation.updated_at = Utc::now();
        Ok(sublocation.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.lock();
        let before = tables.sublocations.len();
        tables.sublocations.retain(|s| s.id != id);
        if tables.sublocations.len() == before {
            return Err(AppError::NotFound("sublocation"));
        }
        for permit in tables
            .permits
            .iter_mut()
            .filter(|p| p.sublocation_id == Some(id))
        {
            permit.sublocation_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl PermitRepository for MemoryUnitOfWork {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Permit>> {
        Ok(self.lock().permits.iter().find(|p| p.id == id).cloned())
    }

    async fn find_details(&self, id: i32) -> AppResult<Option<PermitDetails>> {
        let tables = self.lock();
        let permit = tables.permits.iter().find(|p| p.id == id).cloned();
        Ok(permit.map(|p| tables.details(p)))
    }

    async fn find_by_plate(&self, plate: &str) -> AppResult<Vec<Permit>> {
        Ok(self.lock().plate_history(plate))
    }

    async fn list_details(&self) -> AppResult<Vec<PermitDetails>> {
        let tables = self.lock();
        let permits = tables.newest_first(tables.permits.clone());
        Ok(permits.into_iter().map(|p| tables.details(p)).collect())
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<PermitDetails>> {
        let tables = self.lock();
        let owned = tables
            .permits
            .iter()
            .filter(|p| p.user_id == Some(user_id))
            .cloned()
            .collect();
        let permits = tables.newest_first(owned);
        Ok(permits.into_iter().map(|p| tables.details(p)).collect())
    }

    async fn update(&self, id: i32, changes: PermitChanges) -> AppResult<Permit> {
        let mut tables = self.lock();
        let permit = tables
            .permits
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound("permit"))?;
        if let Some(vplate) = changes.vplate {
            permit.vplate = vplate;
        }
        if let Some(vmake) = changes.vmake {
            permit.vmake = Some(vmake);
        }
        if let Some(vmodel) = changes.vmodel {
            permit.vmodel = Some(vmodel);
        }
        if let Some(vcolor) = changes.vcolor {
            permit.vcolor = Some(vcolor);
        }
        if let Some(location_id) = changes.location_id {
            permit.location_id = location_id;
        }
        if let Some(sublocation_id) = changes.sublocation_id {
            permit.sublocation_id = Some(sublocation_id);
        }
        if let Some(unit) = changes.unit {
            permit.unit = Some(unit);
        }
        if let Some(email) = changes.email {
            permit.email = Some(email);
        }
        if let Some(phone) = changes.phone {
            permit.phone = Some(phone);
        }
        if let Some(first_name) = changes.first_name {
            permit.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            permit.last_name = Some(last_name);
        }
        if let Some(duration) = changes.duration {
            permit.duration = duration;
        }
        if let Some(exp_date) = changes.exp_date {
            permit.exp_date = exp_date;
        }
        permit.updated_at = Utc::now();
        Ok(permit.clone())
    }

    async fn delete_many(&self, ids: Vec<i32>) -> AppResult<u64> {
        let mut tables = self.lock();
        let before = tables.permits.len();
        tables.permits.retain(|p| !ids.contains(&p.id));
        Ok((before - tables.permits.len()) as u64)
    }
}
