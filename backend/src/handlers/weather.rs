//! HTTP handlers for weather lookups

use axum::{extract::State, Json};
use shared::CurrentWeather;

use crate::error::AppResult;
use crate::services::weather::CurrentWeatherInput;
use crate::services::WeatherService;
use crate::AppState;

/// Current weather at a coordinate pair
pub async fn get_current_weather(
    State(state): State<AppState>,
    Json(input): Json<CurrentWeatherInput>,
) -> AppResult<Json<CurrentWeather>> {
    let service = WeatherService::new(state.forecast_source.clone());
    let weather = service.get_current_weather(input).await?;
    Ok(Json(weather))
}
