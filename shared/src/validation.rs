//! Input validation for spraying advisory requests
//!
//! Resolves the caller's location and date into typed values and clamps the
//! requested day to the forecast horizon.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::types::{GpsCoordinates, LocationQuery};

/// Number of daily samples the upstream source can provide
pub const FORECAST_HORIZON_DAYS: usize = 5;

/// Day and hour the caller wants to spray; a bare date means midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDate {
    pub date: NaiveDate,
    pub hour: u32,
}

impl TargetDate {
    pub fn on(date: NaiveDate) -> Self {
        Self { date, hour: 0 }
    }

    pub fn at(datetime: NaiveDateTime) -> Self {
        Self {
            date: datetime.date(),
            hour: datetime.hour(),
        }
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse "today", "tomorrow", an ISO date, or an ISO date-time.
///
/// `today` is the caller's current local calendar day.
pub fn parse_target_date(input: &str, today: NaiveDate) -> AdvisoryResult<TargetDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AdvisoryError::invalid("date", "Date is required."));
    }

    match input.to_lowercase().as_str() {
        "today" => return Ok(TargetDate::on(today)),
        "tomorrow" => return Ok(TargetDate::on(today + Duration::days(1))),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(TargetDate::on(date));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        // Keep the wall-clock time the caller wrote, not UTC
        return Ok(TargetDate::at(datetime.naive_local()));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(TargetDate::at)
        .ok_or_else(|| {
            AdvisoryError::invalid(
                "date",
                format!(
                    "Invalid date '{}'. Use 'today', 'tomorrow', YYYY-MM-DD or YYYY-MM-DDTHH:MM.",
                    input
                ),
            )
        })
}

/// Zero-based forecast index for `target`, clamped to the forecast horizon
pub fn resolve_day_offset(target: NaiveDate, today: NaiveDate) -> usize {
    let max_offset = (FORECAST_HORIZON_DAYS - 1) as i64;
    (target - today).num_days().clamp(0, max_offset) as usize
}

/// Validate latitude/longitude ranges
pub fn validate_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Pick the location to forecast for. A place name wins over coordinates.
pub fn resolve_location(
    location: Option<&str>,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
) -> AdvisoryResult<LocationQuery> {
    if let Some(name) = location.map(str::trim).filter(|name| !name.is_empty()) {
        return Ok(LocationQuery::Name(name.to_string()));
    }

    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => {
            validate_coordinates(latitude, longitude)
                .map_err(|msg| AdvisoryError::invalid("coordinates", msg))?;
            Ok(LocationQuery::Coordinates(GpsCoordinates::new(latitude, longitude)))
        }
        (Some(_), None) => Err(AdvisoryError::invalid(
            "longitude",
            "Longitude is required when latitude is provided.",
        )),
        (None, Some(_)) => Err(AdvisoryError::invalid(
            "latitude",
            "Latitude is required when longitude is provided.",
        )),
        (None, None) => Err(AdvisoryError::invalid(
            "location",
            "Either 'location' or 'latitude' and 'longitude' must be provided.",
        )),
    }
}
