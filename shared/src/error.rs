//! Error types for spraying advisories and forecast lookups

use thiserror::Error;

/// Failure reported by a forecast source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    #[error("OpenWeatherMap API key is not configured.")]
    NotConfigured,

    #[error("Location not found. Please check the spelling or coordinates.")]
    LocationNotFound,

    #[error("Could not fetch forecast. Please try again later. ({0})")]
    Unavailable(String),

    #[error("Forecast response could not be read: {0}")]
    InvalidResponse(String),
}

/// Outcome of a failed advisory request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisoryError {
    /// Caller supplied a missing or malformed location or date
    #[error("Validation error on {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// The forecast source failed or has no sample for the requested day
    #[error("{message}")]
    ForecastUnavailable {
        message: String,
        #[source]
        source: Option<ForecastError>,
    },
}

impl AdvisoryError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AdvisoryError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Wrap an upstream failure with the advisory context
    pub fn from_source(source: ForecastError) -> Self {
        AdvisoryError::ForecastUnavailable {
            message: format!("Could not get weather data for spraying advice: {}", source),
            source: Some(source),
        }
    }

    /// The source answered but had no sample for the requested day
    pub fn no_forecast_for(date: &str, location: &str) -> Self {
        AdvisoryError::ForecastUnavailable {
            message: format!(
                "No forecast available for {} in {}. Please ensure the date is within the next 5 days.",
                date, location
            ),
            source: None,
        }
    }
}

pub type AdvisoryResult<T> = Result<T, AdvisoryError>;
