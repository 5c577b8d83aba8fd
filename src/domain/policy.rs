//! Permit eligibility and expiry rules.
//!
//! A plate may hold at most one active permit at a time, and the permit days
//! ever issued to a plate may not exceed the location's cumulative cap.
//! Expiry is anchored on the location's daily curfew reset.
//!
//! The cap is named "monthly" in the data model but is applied to every
//! historical permit of the plate, not to a calendar window.

use chrono::{Days, NaiveDate, NaiveDateTime, SubsecRound};
use thiserror::Error;

use super::{Location, Permit};
use crate::errors::{AppError, AppResult};

/// Business-rule refusals of a permit request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermitRejection {
    #[error("The license plate: {plate} already has an active permit")]
    PlateAlreadyActive { plate: String },

    #[error("You have reached the max allotment of time you may register for")]
    DurationCapExceeded { accumulated: i64, cap: i32 },
}

/// Eligibility rules of one location.
#[derive(Debug, Clone, Copy)]
pub struct PermitPolicy<'a> {
    location: &'a Location,
}

impl<'a> PermitPolicy<'a> {
    pub fn new(location: &'a Location) -> Self {
        Self { location }
    }

    /// Decide whether `plate` may get a new permit of `duration` days and
    /// return its expiry.
    ///
    /// `prior` holds every permit previously issued to the plate, in any order.
    pub fn evaluate(
        &self,
        plate: &str,
        prior: &[Permit],
        duration: i32,
        requested_at: NaiveDateTime,
    ) -> AppResult<NaiveDateTime> {
        if duration < 0 {
            return Err(AppError::invalid_field(
                "duration",
                "Duration cannot be negative",
            ));
        }

        if let Some(latest) = latest_permit(prior) {
            if latest.exp_date.trunc_subsecs(0) > requested_at.trunc_subsecs(0) {
                return Err(PermitRejection::PlateAlreadyActive {
                    plate: plate.to_string(),
                }
                .into());
            }

            let accumulated = prior
                .iter()
                .fold(i64::from(duration), |acc, p| acc + i64::from(p.duration));
            let cap = self.location.max_monthly_duration;

            if cap != 0 && accumulated > i64::from(cap) {
                return Err(PermitRejection::DurationCapExceeded { accumulated, cap }.into());
            }
        }

        self.expiry(duration, requested_at.date())
    }

    /// Curfew reset on `today`, pushed forward by `duration` days.
    pub fn expiry(&self, duration: i32, today: NaiveDate) -> AppResult<NaiveDateTime> {
        let anchor = today.and_time(self.location.curfew_reset).trunc_subsecs(0);

        if duration == 0 {
            return Ok(anchor);
        }

        u64::try_from(duration)
            .ok()
            .and_then(|days| anchor.checked_add_days(Days::new(days)))
            .ok_or_else(|| AppError::invalid_field("duration", "Duration is out of range"))
    }
}

/// Most recently created permit; ties go to the higher id.
fn latest_permit(prior: &[Permit]) -> Option<&Permit> {
    prior.iter().max_by_key(|p| (p.created_at, p.id))
}
