//! Permit entity and related types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Location, Sublocation, UserResponse};

/// A time-bounded parking authorization for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "ABC123")]
    pub vplate: String,
    pub vmake: Option<String>,
    pub vmodel: Option<String>,
    pub vcolor: Option<String>,
    pub user_id: Option<i32>,
    #[schema(example = 1)]
    pub location_id: i32,
    pub sublocation_id: Option<i32>,
    pub unit: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Days requested; 0 means "until the next curfew reset"
    #[schema(example = 3)]
    pub duration: i32,
    /// Local expiry timestamp, second precision
    #[schema(value_type = String, example = "2024-01-04T23:59:59")]
    pub exp_date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A permit with its related records embedded.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermitDetails {
    #[serde(flatten)]
    pub permit: Permit,
    pub location: Option<Location>,
    pub sublocation: Option<Sublocation>,
    pub user: Option<UserResponse>,
}

/// A permit request as submitted by a resident or visitor.
#[derive(Debug, Clone, PartialEq)]
pub struct PermitRequest {
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
}

impl PermitRequest {
    /// Turn an accepted request into an insertable permit.
    pub fn into_new_permit(self, exp_date: NaiveDateTime) -> NewPermit {
        NewPermit {
            vplate: normalize_plate(&self.vplate),
            vmake: self.vmake,
            vmodel: self.vmodel,
            vcolor: self.vcolor,
            user_id: self.user_id,
            location_id: self.location_id,
            sublocation_id: self.sublocation_id,
            unit: self.unit,
            email: self.email,
            phone: self.phone,
            first_name: self.first_name,
            last_name: self.last_name,
            duration: self.duration,
            exp_date,
        }
    }
}

/// Data needed to insert a permit; `exp_date` is already computed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPermit {
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
    pub exp_date: NaiveDateTime,
}

impl NewPermit {
    /// The stored form of this permit under `id`.
    pub fn into_permit(self, id: i32, created_at: DateTime<Utc>) -> Permit {
        Permit {
            id,
            vplate: self.vplate,
            vmake: self.vmake,
            vmodel: self.vmodel,
            vcolor: self.vcolor,
            user_id: self.user_id,
            location_id: self.location_id,
            sublocation_id: self.sublocation_id,
            unit: self.unit,
            email: self.email,
            phone: self.phone,
            first_name: self.first_name,
            last_name: self.last_name,
            duration: self.duration,
            exp_date: self.exp_date,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Partial permit update made by an admin. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermitChanges {
    pub vplate: Option<String>,
    pub vmake: Option<String>,
    pub vmodel: Option<String>,
    pub vcolor: Option<String>,
    pub location_id: Option<i32>,
    pub sublocation_id: Option<i32>,
    pub unit: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub duration: Option<i32>,
    pub exp_date: Option<NaiveDateTime>,
}

/// Canonical plate form used for storage and lookups.
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}
