//! WebAssembly module for the Spraying Advisory Platform
//!
//! Provides client-side computation for:
//! - Spraying suitability of a forecast sample
//! - Rain probability from condition descriptions
//! - Forecast day offsets for a requested date

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&"spraying advisor wasm module loaded".into());
}

/// Evaluate a forecast sample and return the advice as JSON.
///
/// A missing `target_hour` is treated as midnight. `thresholds_json` may
/// override any subset of the default thresholds.
#[wasm_bindgen]
pub fn evaluate_spraying_forecast(
    location: &str,
    forecast_item_json: &str,
    target_hour: Option<u32>,
    thresholds_json: Option<String>,
) -> Result<String, JsValue> {
    evaluate_forecast_json(location, forecast_item_json, target_hour, thresholds_json.as_deref())
        .map_err(|e| {
            web_sys::console::warn_1(&e.clone().into());
            JsValue::from_str(&e)
        })
}

/// Rain probability (%) implied by a condition description
#[wasm_bindgen]
pub fn rain_probability_for(description: &str) -> u8 {
    derive_rain_probability(description)
}

/// Default thresholds as JSON, for display in forms
#[wasm_bindgen]
pub fn default_spraying_thresholds() -> String {
    serde_json::to_string(&SprayingThresholds::default()).unwrap_or_default()
}

/// Index into a five-day forecast for `date_input`, relative to the browser's local day
#[wasm_bindgen]
pub fn forecast_day_offset(date_input: &str) -> Result<u32, JsValue> {
    let now = js_sys::Date::new_0();
    let today = NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .ok_or_else(|| JsValue::from_str("Browser clock returned an invalid date"))?;

    day_offset_for(date_input, today).map_err(|e| JsValue::from_str(&e))
}

fn evaluate_forecast_json(
    location: &str,
    forecast_item_json: &str,
    target_hour: Option<u32>,
    thresholds_json: Option<&str>,
) -> Result<String, String> {
    let item: ForecastItem = serde_json::from_str(forecast_item_json)
        .map_err(|e| format!("Invalid forecast JSON: {}", e))?;

    let thresholds = match thresholds_json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json)
            .map_err(|e| format!("Invalid thresholds JSON: {}", e))?,
        _ => SprayingThresholds::default(),
    };

    if target_hour.is_some_and(|hour| hour > 23) {
        return Err("Hour must be between 0 and 23".to_string());
    }

    let hour = target_hour.unwrap_or(0);
    let advice = assess_spraying_conditions(location, &item, Some(hour), &thresholds);
    serde_json::to_string(&advice).map_err(|e| e.to_string())
}

fn day_offset_for(date_input: &str, today: NaiveDate) -> Result<u32, String> {
    let target = parse_target_date(date_input, today).map_err(|e| e.to_string())?;
    Ok(resolve_day_offset(target.date, today) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample(wind: f64, description: &str) -> String {
        json!({
            "date": "2026-10-16",
            "temperature": 16.0,
            "feels_like": 15.0,
            "humidity": 70.0,
            "wind_speed": wind,
            "description": description,
            "unit": "Celsius",
            "iconUrl": "https://openweathermap.org/img/wn/01d@2x.png"
        })
        .to_string()
    }

    fn evaluate(json: &str, hour: Option<u32>) -> Value {
        serde_json::from_str(&evaluate_forecast_json("Leeds", json, hour, None).unwrap()).unwrap()
    }

    #[test]
    fn test_good_conditions() {
        let advice = evaluate(&sample(10.0, "clear sky"), None);
        assert_eq!(advice["status"], "Good");
        assert_eq!(advice["date"], "2026-10-16");
        assert_eq!(advice["details"]["rainProbability"], 0);
    }

    #[test]
    fn test_calm_evening_is_caution() {
        let advice = evaluate(&sample(3.0, "clear sky"), Some(19));
        assert_eq!(advice["status"], "Caution");
        assert_eq!(advice["reasons"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_calm_day_without_hour_is_midnight() {
        let without_hour = evaluate(&sample(3.0, "clear sky"), None);
        let at_midnight = evaluate(&sample(3.0, "clear sky"), Some(0));
        assert_eq!(without_hour, at_midnight);
        assert_eq!(without_hour["reasons"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_threshold_override() {
        let strict = json!({ "rain_probability": { "unsuitable_above": 40.0, "caution_above": 0.0 } })
            .to_string();
        let raw = evaluate_forecast_json("Leeds", &sample(10.0, "light rain"), None, Some(&strict))
            .unwrap();
        let advice: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(advice["status"], "Unsuitable");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(evaluate_forecast_json("Leeds", "{}", None, None).is_err());
        assert!(evaluate_forecast_json("Leeds", &sample(10.0, "clear sky"), Some(24), None).is_err());
    }

    #[test]
    fn test_rain_probability() {
        assert_eq!(rain_probability_for("light rain showers"), 50);
        assert_eq!(rain_probability_for("Thunderstorm"), 80);
        assert_eq!(rain_probability_for("clear sky"), 0);
    }

    #[test]
    fn test_day_offset() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assert_eq!(day_offset_for("today", today), Ok(0));
        assert_eq!(day_offset_for("tomorrow", today), Ok(1));
        assert_eq!(day_offset_for("2026-10-25", today), Ok(4));
        assert!(day_offset_for("next week", today).is_err());
    }

    #[test]
    fn test_default_thresholds_json() {
        let thresholds: Value = serde_json::from_str(&default_spraying_thresholds()).unwrap();
        assert_eq!(thresholds["wind_speed"]["optimal_min"], 5.0);
        assert_eq!(thresholds["inversion"]["evening_from_hour"], 18);
    }
}
