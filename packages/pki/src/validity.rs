//! Certificate validity windows
//!
//! `not_after` is `not_before` plus a whole number of calendar years,
//! truncated down to midnight UTC. `not_before` itself is kept at the instant
//! of issuance.

use time::{Date, Month, OffsetDateTime, Time, UtcOffset};

use crate::error::{PkiError, Result};

/// Start and end of a certificate's validity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    /// First instant the certificate is valid
    pub not_before: OffsetDateTime,
    /// Midnight UTC at or before `not_before + ttl_years`
    pub not_after: OffsetDateTime,
}

impl ValidityWindow {
    /// Window starting now
    pub fn from_now(ttl_years: u32) -> Result<Self> {
        Self::starting_at(OffsetDateTime::now_utc(), ttl_years)
    }

    /// Window starting at `not_before`
    pub fn starting_at(not_before: OffsetDateTime, ttl_years: u32) -> Result<Self> {
        let not_before = not_before.to_offset(UtcOffset::UTC);
        let shifted = add_years(not_before, ttl_years)?;
        let not_after = shifted.replace_time(Time::MIDNIGHT);
        Ok(Self {
            not_before,
            not_after,
        })
    }
}

/// Add calendar years, moving February 29 to March 1 in non-leap target years
fn add_years(at: OffsetDateTime, years: u32) -> Result<OffsetDateTime> {
    let year = i32::try_from(years)
        .ok()
        .and_then(|years| at.year().checked_add(years))
        .ok_or_else(|| PkiError::InvalidValidity(format!("{years} years overflows the calendar")))?;

    let date = match Date::from_calendar_date(year, at.month(), at.day()) {
        Ok(date) => date,
        Err(_) => Date::from_calendar_date(year, Month::March, 1)
            .map_err(|e| PkiError::InvalidValidity(format!("year {year}: {e}")))?,
    };

    Ok(at.replace_date(date))
}
