//! Weather data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::TemperatureUnit;

/// A single day's midday-representative forecast sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastItem {
    pub date: NaiveDate,
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// km/h for metric sources, mph for imperial
    pub wind_speed: f64,
    pub description: String,
    pub unit: TemperatureUnit,
    #[serde(rename = "iconUrl")]
    pub icon_url: String,
}

/// Multi-day forecast for a resolved location, soonest day first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastData {
    pub location: String,
    pub forecast: Vec<ForecastItem>,
}

/// Current weather conditions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentWeather {
    pub location: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub description: String,
    pub wind_speed: f64,
    pub unit: TemperatureUnit,
    #[serde(rename = "iconUrl")]
    pub icon_url: String,
}
