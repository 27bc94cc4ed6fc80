//! Weather API client for fetching weather data
//!
//! Integrates with OpenWeatherMap API for current conditions and 5-day forecasts

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{CurrentWeather, ForecastData, ForecastError, ForecastItem, LocationQuery, UnitSystem};
use std::collections::HashSet;
use std::time::Duration;

use super::ForecastSource;
use crate::config::WeatherConfig;

/// Local hours accepted as a day's midday sample
const MIDDAY_HOURS: std::ops::RangeInclusive<u32> = 10..=14;

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    icon_base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
    wind: OWMWind,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    city: OWMCity,
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMCity {
    name: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    weather: Vec<OWMWeather>,
    wind: OWMWind,
}

impl WeatherClient {
    /// Build a client from configuration, applying the request timeout
    pub fn from_config(config: &WeatherConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.trim().to_string(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            icon_base_url: config.icon_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Icon URL for an OpenWeatherMap icon code
    pub fn icon_url(&self, icon_code: &str) -> String {
        format!("{}/{}@2x.png", self.icon_base_url, icon_code)
    }

    /// Issue a GET against `endpoint` for `location` and decode the body
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<T, ForecastError> {
        if self.api_key.is_empty() {
            return Err(ForecastError::NotConfigured);
        }

        let mut query: Vec<(&str, String)> = vec![
            ("appid", self.api_key.clone()),
            ("units", units.code().to_string()),
        ];
        match location {
            LocationQuery::Name(name) => query.push(("q", name.clone())),
            LocationQuery::Coordinates(coords) => {
                query.push(("lat", coords.latitude.to_string()));
                query.push(("lon", coords.longitude.to_string()));
            }
        }

        tracing::debug!("Requesting {} for {}", endpoint, location);

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Weather API request for {} failed: {}", location, e);
                ForecastError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ForecastError::LocationNotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Weather API error for {}: {} - {}", location, status, body);
            return Err(ForecastError::Unavailable(format!("{} - {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| ForecastError::InvalidResponse(e.to_string()))
    }

    /// Convert OpenWeatherMap current response to our format
    fn convert_current_response(&self, data: OWMCurrentResponse, units: UnitSystem) -> CurrentWeather {
        let weather = data.weather.first();

        CurrentWeather {
            location: data.name,
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            humidity: data.main.humidity,
            description: weather.map(|w| w.description.clone()).unwrap_or_default(),
            wind_speed: convert_wind_speed(data.wind.speed, units),
            unit: units.temperature_unit(),
            icon_url: self.icon_url(weather.map(|w| w.icon.as_str()).unwrap_or_default()),
        }
    }

    /// Reduce the 3-hourly forecast list to one midday sample per local day
    fn convert_forecast_response(
        &self,
        data: OWMForecastResponse,
        days: usize,
        units: UnitSystem,
    ) -> ForecastData {
        let offset = FixedOffset::east_opt(data.city.timezone).unwrap_or_else(|| Utc.fix());

        let mut seen_dates = HashSet::new();
        let mut forecast = Vec::with_capacity(days);

        for item in data.list {
            if forecast.len() >= days {
                break;
            }
            let Some(local) = DateTime::from_timestamp(item.dt, 0).map(|t| t.with_timezone(&offset))
            else {
                continue;
            };
            let date = local.date_naive();
            if seen_dates.contains(&date) || !MIDDAY_HOURS.contains(&local.hour()) {
                continue;
            }
            seen_dates.insert(date);

            let weather = item.weather.first();
            forecast.push(ForecastItem {
                date,
                temperature: item.main.temp,
                feels_like: item.main.feels_like,
                humidity: item.main.humidity,
                wind_speed: convert_wind_speed(item.wind.speed, units),
                description: weather.map(|w| w.description.clone()).unwrap_or_default(),
                unit: units.temperature_unit(),
                icon_url: self.icon_url(weather.map(|w| w.icon.as_str()).unwrap_or_default()),
            });
        }

        ForecastData {
            location: data.city.name,
            forecast,
        }
    }
}

/// OpenWeatherMap reports m/s for metric; rules are written in km/h
fn convert_wind_speed(speed: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => (speed * 3.6 * 10.0).round() / 10.0,
        UnitSystem::Imperial => speed,
    }
}

#[async_trait]
impl ForecastSource for WeatherClient {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn get_forecast(
        &self,
        location: &LocationQuery,
        days: usize,
        units: UnitSystem,
    ) -> Result<ForecastData, ForecastError> {
        let data: OWMForecastResponse = self.fetch("forecast", location, units).await?;
        Ok(self.convert_forecast_response(data, days, units))
    }

    async fn get_current_weather(
        &self,
        location: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentWeather, ForecastError> {
        let data: OWMCurrentResponse = self.fetch("weather", location, units).await?;
        Ok(self.convert_current_response(data, units))
    }
}
