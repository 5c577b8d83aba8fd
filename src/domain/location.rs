//! Location and sublocation entities.

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{DEFAULT_CURFEW_RESET, DEFAULT_MAX_FORM_DURATION, DEFAULT_MAX_MONTHLY_DURATION};

/// A parking location with its permit limits.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Maple Court")]
    pub name: String,
    /// Max days a single permit may request
    #[schema(example = 31)]
    pub max_form_duration: i32,
    /// Max cumulative permit days per plate; 0 disables the cap
    #[schema(example = 31)]
    pub max_monthly_duration: i32,
    /// Daily time-of-day that anchors permit expiry
    #[schema(value_type = String, example = "23:59:59")]
    pub curfew_reset: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The curfew reset used when a location does not specify one.
pub fn default_curfew_reset() -> NaiveTime {
    let (h, m, s) = DEFAULT_CURFEW_RESET;
    NaiveTime::from_hms_opt(h, m, s).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationWithSublocations {
    #[serde(flatten)]
    pub location: Location,
    pub sublocations: Vec<Sublocation>,
}

/// Data needed to insert a location.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub name: String,
    pub max_form_duration: i32,
    pub max_monthly_duration: i32,
    pub curfew_reset: NaiveTime,
}

impl NewLocation {
    /// Fill unspecified limits with the location defaults.
    pub fn with_defaults(
        name: String,
        max_form_duration: Option<i32>,
        max_monthly_duration: Option<i32>,
        curfew_reset: Option<NaiveTime>,
    ) -> Self {
        Self {
            name,
            max_form_duration: max_form_duration.unwrap_or(DEFAULT_MAX_FORM_DURATION),
            max_monthly_duration: max_monthly_duration.unwrap_or(DEFAULT_MAX_MONTHLY_DURATION),
            curfew_reset: curfew_reset.unwrap_or_else(default_curfew_reset),
        }
    }
}

/// Partial location update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationChanges {
    pub name: Option<String>,
    pub max_form_duration: Option<i32>,
    pub max_monthly_duration: Option<i32>,
    pub curfew_reset: Option<NaiveTime>,
}

/// A named area inside a location (building, lot, wing).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sublocation {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Building B")]
    pub name: String,
    #[schema(example = 1)]
    pub location_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SublocationDetails {
    #[serde(flatten)]
    pub sublocation: Sublocation,
    pub location: Option<Location>,
}
