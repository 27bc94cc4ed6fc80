//! Weather service for current conditions at a coordinate pair

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{validate_coordinates, CurrentWeather, GpsCoordinates, LocationQuery, UnitSystem};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::external::ForecastSource;

/// Weather service for current conditions
#[derive(Clone)]
pub struct WeatherService {
    source: Arc<dyn ForecastSource>,
}

/// Input for a current weather lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentWeatherInput {
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Fetch current weather in metric units
    pub async fn get_current_weather(&self, input: CurrentWeatherInput) -> AppResult<CurrentWeather> {
        let (latitude, longitude) = match (input.latitude, input.longitude) {
            (Some(latitude), Some(longitude)) => (latitude, longitude),
            _ => {
                return Err(AppError::Validation {
                    field: "coordinates".to_string(),
                    message: "Latitude and longitude are required.".to_string(),
                })
            }
        };

        validate_coordinates(latitude, longitude).map_err(|msg| AppError::Validation {
            field: "coordinates".to_string(),
            message: msg.to_string(),
        })?;

        let location = LocationQuery::Coordinates(GpsCoordinates::new(latitude, longitude));
        tracing::debug!("Fetching current weather for {}", location);

        let weather = self
            .source
            .get_current_weather(&location, UnitSystem::Metric)
            .await
            .map_err(|e| {
                tracing::warn!("Current weather lookup for {} failed: {}", location, e);
                AppError::from(e)
            })?;

        Ok(weather)
    }
}
