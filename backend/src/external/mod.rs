//! External API integrations

pub mod weather;

use async_trait::async_trait;
use shared::{CurrentWeather, ForecastData, ForecastError, LocationQuery, UnitSystem};

pub use weather::WeatherClient;

/// Source of forecast and current weather data.
///
/// Implementations must return `forecast` ordered soonest day first.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Short identifier used in logs and health output
    fn name(&self) -> &'static str;

    /// Whether the source has the credentials it needs
    fn is_configured(&self) -> bool;

    /// Up to `days` daily samples for `location`
    async fn get_forecast(
        &self,
        location: &LocationQuery,
        days: usize,
        units: UnitSystem,
    ) -> Result<ForecastData, ForecastError>;

    async fn get_current_weather(
        &self,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentWeather, ForecastError>;
}
