//! Spraying suitability models and the rule evaluator
//!
//! A forecast sample is checked against wind, temperature, humidity and rain
//! thresholds, followed by a temperature-inversion heuristic. The overall
//! status is the most severe outcome of all checks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::weather::ForecastItem;

/// Reason emitted when no rule fired
pub const OPTIMAL_CONDITIONS_REASON: &str = "All weather parameters appear within optimal ranges.";

/// Reason emitted by the inversion heuristic
pub const INVERSION_RISK_REASON: &str = "Potential for temperature inversion due to calm and clear conditions. Avoid spraying if an inversion is suspected.";

/// Spraying suitability verdict, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub enum SprayingStatus {
    #[default]
    Good,
    Caution,
    Unsuitable,
}

impl std::fmt::Display for SprayingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SprayingStatus::Good => write!(f, "Good"),
            SprayingStatus::Caution => write!(f, "Caution"),
            SprayingStatus::Unsuitable => write!(f, "Unsuitable"),
        }
    }
}

/// Optimal range nested inside a wider caution range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThresholdBand {
    pub optimal_min: f64,
    pub optimal_max: f64,
    pub caution_min: f64,
    pub caution_max: f64,
}

impl ThresholdBand {
    pub const fn new(optimal_min: f64, optimal_max: f64, caution_min: f64, caution_max: f64) -> Self {
        Self {
            optimal_min,
            optimal_max,
            caution_min,
            caution_max,
        }
    }

    /// Both bounds are inclusive
    pub fn classify(&self, value: f64) -> SprayingStatus {
        if value < self.caution_min || value > self.caution_max {
            SprayingStatus::Unsuitable
        } else if value < self.optimal_min || value > self.optimal_max {
            SprayingStatus::Caution
        } else {
            SprayingStatus::Good
        }
    }
}

/// Rain probability limits (%)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RainThresholds {
    pub unsuitable_above: f64,
    pub caution_above: f64,
}

impl RainThresholds {
    pub fn classify(&self, probability: u8) -> SprayingStatus {
        let p = f64::from(probability);
        if p > self.unsuitable_above {
            SprayingStatus::Unsuitable
        } else if p > self.caution_above {
            SprayingStatus::Caution
        } else {
            SprayingStatus::Good
        }
    }
}

/// Conditions under which a temperature inversion is suspected
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InversionThresholds {
    /// Wind strictly below this speed counts as calm (km/h)
    pub calm_wind_below: f64,
    /// Hours at or after this are evening/night
    pub evening_from_hour: u32,
    /// Hours at or before this are early morning
    pub morning_until_hour: u32,
}

impl InversionThresholds {
    pub fn is_off_hours(&self, hour: u32) -> bool {
        hour >= self.evening_from_hour || hour <= self.morning_until_hour
    }
}

/// Full threshold set used by the evaluator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SprayingThresholds {
    /// km/h
    pub wind_speed: ThresholdBand,
    /// °C
    pub temperature: ThresholdBand,
    /// %
    pub humidity: ThresholdBand,
    pub rain_probability: RainThresholds,
    pub inversion: InversionThresholds,
}

impl Default for SprayingThresholds {
    fn default() -> Self {
        Self {
            wind_speed: ThresholdBand::new(5.0, 20.0, 2.0, 25.0),
            temperature: ThresholdBand::new(12.0, 20.0, 4.0, 25.0),
            humidity: ThresholdBand::new(60.0, 85.0, 45.0, 95.0),
            rain_probability: RainThresholds {
                unsuitable_above: 20.0,
                caution_above: 0.0,
            },
            inversion: InversionThresholds {
                calm_wind_below: 5.0,
                evening_from_hour: 18,
                morning_until_hour: 8,
            },
        }
    }
}

/// Severity and explanation contributed by a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub status: SprayingStatus,
    pub reason: String,
}

impl RuleOutcome {
    fn new(status: SprayingStatus, reason: String) -> Self {
        Self { status, reason }
    }
}

/// Weather values the verdict was based on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SprayingDetails {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    #[serde(rename = "windSpeed")]
    pub wind_speed: f64,
    pub description: String,
    #[serde(rename = "rainProbability")]
    pub rain_probability: u8,
    #[serde(rename = "iconUrl")]
    pub icon_url: String,
}

/// Spraying advisory for one location and day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SprayingAdvice {
    pub location: String,
    pub date: NaiveDate,
    pub status: SprayingStatus,
    pub reasons: Vec<String>,
    pub details: SprayingDetails,
}

/// Estimate rain probability (%) from a free-text condition description.
///
/// Storms take precedence over plain rain wording.
pub fn derive_rain_probability(description: &str) -> u8 {
    let description = description.to_lowercase();
    if description.contains("storm") {
        80
    } else if ["rain", "drizzle", "shower"]
        .iter()
        .any(|word| description.contains(word))
    {
        50
    } else {
        0
    }
}

fn check_wind(wind_speed: f64, band: &ThresholdBand) -> Option<RuleOutcome> {
    let status = band.classify(wind_speed);
    let reason = match status {
        SprayingStatus::Good => return None,
        SprayingStatus::Caution => format!(
            "Wind speed ({} km/h) is marginal (ideal {}-{} km/h). Exercise caution.",
            wind_speed, band.optimal_min, band.optimal_max
        ),
        SprayingStatus::Unsuitable => format!(
            "Wind speed ({} km/h) is unsuitable (ideal {}-{} km/h). Risk of drift or inversion.",
            wind_speed, band.optimal_min, band.optimal_max
        ),
    };
    Some(RuleOutcome::new(status, reason))
}

fn check_temperature(temperature: f64, band: &ThresholdBand) -> Option<RuleOutcome> {
    let status = band.classify(temperature);
    let reason = match status {
        SprayingStatus::Good => return None,
        SprayingStatus::Caution => format!(
            "Temperature ({}°C) is marginal (ideal {}-{}°C). Exercise caution.",
            temperature, band.optimal_min, band.optimal_max
        ),
        SprayingStatus::Unsuitable => format!(
            "Temperature ({}°C) is unsuitable (ideal {}-{}°C). Risk of reduced efficacy or plant damage.",
            temperature, band.optimal_min, band.optimal_max
        ),
    };
    Some(RuleOutcome::new(status, reason))
}

fn check_humidity(humidity: f64, band: &ThresholdBand) -> Option<RuleOutcome> {
    let status = band.classify(humidity);
    let reason = match status {
        SprayingStatus::Good => return None,
        SprayingStatus::Caution => format!(
            "Humidity ({}%) is marginal (ideal {}-{}%). Exercise caution.",
            humidity, band.optimal_min, band.optimal_max
        ),
        SprayingStatus::Unsuitable => format!(
            "Humidity ({}%) is unsuitable (ideal {}-{}%). Risk of rapid evaporation or excessive droplet persistence.",
            humidity, band.optimal_min, band.optimal_max
        ),
    };
    Some(RuleOutcome::new(status, reason))
}

fn check_rain(probability: u8, limits: &RainThresholds) -> Option<RuleOutcome> {
    let status = limits.classify(probability);
    let reason = match status {
        SprayingStatus::Good => return None,
        SprayingStatus::Caution => format!(
            "Some chance of rain ({}%). Consider product rainfastness and forecast.",
            probability
        ),
        SprayingStatus::Unsuitable => {
            format!("High chance of rain ({}%). Product may wash off.", probability)
        }
    };
    Some(RuleOutcome::new(status, reason))
}

fn check_inversion(
    wind_speed: f64,
    target_hour: Option<u32>,
    limits: &InversionThresholds,
) -> Option<RuleOutcome> {
    let calm = wind_speed < limits.calm_wind_below;
    let off_hours = target_hour.is_some_and(|hour| limits.is_off_hours(hour));

    (calm && off_hours).then(|| {
        RuleOutcome::new(SprayingStatus::Caution, INVERSION_RISK_REASON.to_string())
    })
}

/// Run every rule against a sample, in evaluation order:
/// wind, temperature, humidity, rain, inversion.
pub fn evaluate_rules(
    item: &ForecastItem,
    target_hour: Option<u32>,
    thresholds: &SprayingThresholds,
) -> Vec<RuleOutcome> {
    let rain_probability = derive_rain_probability(&item.description);

    [
        check_wind(item.wind_speed, &thresholds.wind_speed),
        check_temperature(item.temperature, &thresholds.temperature),
        check_humidity(item.humidity, &thresholds.humidity),
        check_rain(rain_probability, &thresholds.rain_probability),
        check_inversion(item.wind_speed, target_hour, &thresholds.inversion),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Most severe status across outcomes; `Good` when none fired
pub fn combine_status(outcomes: &[RuleOutcome]) -> SprayingStatus {
    outcomes
        .iter()
        .fold(SprayingStatus::Good, |status, outcome| status.max(outcome.status))
}

/// Build the advisory for a single forecast sample.
///
/// `target_hour` is the hour of day the caller intends to spray, when known.
/// It only feeds the inversion heuristic.
pub fn assess_spraying_conditions(
    location: &str,
    item: &ForecastItem,
    target_hour: Option<u32>,
    thresholds: &SprayingThresholds,
) -> SprayingAdvice {
    let outcomes = evaluate_rules(item, target_hour, thresholds);
    let status = combine_status(&outcomes);

    let mut reasons: Vec<String> = outcomes.into_iter().map(|o| o.reason).collect();
    if reasons.is_empty() {
        reasons.push(OPTIMAL_CONDITIONS_REASON.to_string());
    }

    SprayingAdvice {
        location: location.to_string(),
        date: item.date,
        status,
        reasons,
        details: SprayingDetails {
            temperature: item.temperature,
            feels_like: item.feels_like,
            humidity: item.humidity,
            wind_speed: item.wind_speed,
            description: item.description.clone(),
            rain_probability: derive_rain_probability(&item.description),
            icon_url: item.icon_url.clone(),
        },
    }
}
