//! Spraying advisory service
//!
//! Resolves the request into a location and forecast day, fetches the
//! forecast once and runs the rule evaluator on the matching sample.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    assess_spraying_conditions, parse_target_date, resolve_day_offset, resolve_location,
    AdvisoryError, AdvisoryResult, SprayingAdvice, SprayingThresholds, UnitSystem,
};
use std::sync::Arc;

use crate::external::ForecastSource;

/// Spraying advisory service
#[derive(Clone)]
pub struct SprayingAdvisorService {
    source: Arc<dyn ForecastSource>,
    thresholds: SprayingThresholds,
}

/// Input for requesting spraying advice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SprayingAdviceInput {
    pub location: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    /// "today", "tomorrow", YYYY-MM-DD or YYYY-MM-DDTHH:MM
    pub date: Option<String>,
}

impl SprayingAdvisorService {
    /// Create a new SprayingAdvisorService instance
    pub fn new(source: Arc<dyn ForecastSource>, thresholds: SprayingThresholds) -> Self {
        Self { source, thresholds }
    }

    /// Advice relative to the server's current local day
    pub async fn get_advice(&self, input: SprayingAdviceInput) -> AdvisoryResult<SprayingAdvice> {
        self.get_advice_on(input, Local::now().date_naive()).await
    }

    /// Advice relative to `today`
    pub async fn get_advice_on(
        &self,
        input: SprayingAdviceInput,
        today: NaiveDate,
    ) -> AdvisoryResult<SprayingAdvice> {
        let raw_date = input
            .date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .ok_or_else(|| AdvisoryError::invalid("date", "Date is required."))?;

        let location = resolve_location(input.location.as_deref(), input.latitude, input.longitude)?;
        let target = parse_target_date(raw_date, today)?;
        let offset = resolve_day_offset(target.date, today);
        let location_label = location.to_string();

        tracing::debug!(
            "Spraying advice requested for {} on {} (forecast day {})",
            location_label,
            target.date,
            offset
        );

        let forecast = self
            .source
            .get_forecast(&location, offset + 1, UnitSystem::Metric)
            .await
            .map_err(|e| {
                tracing::warn!("Forecast lookup for {} failed: {}", location_label, e);
                AdvisoryError::from_source(e)
            })?;

        let sample = forecast
            .forecast
            .get(offset)
            .ok_or_else(|| AdvisoryError::no_forecast_for(raw_date, &location_label))?;

        let advice = assess_spraying_conditions(
            &location_label,
            sample,
            Some(target.hour),
            &self.thresholds,
        );

        tracing::info!(
            "Spraying advice for {} on {}: {} ({} reasons)",
            advice.location,
            advice.date,
            advice.status,
            advice.reasons.len()
        );

        Ok(advice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::{
        CurrentWeather, ForecastData, ForecastError, ForecastItem, LocationQuery, SprayingStatus,
        TemperatureUnit, INVERSION_RISK_REASON, OPTIMAL_CONDITIONS_REASON,
    };
    use std::str::FromStr;
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    /// In-memory forecast source recording what was asked of it
    struct StubSource {
        days: Vec<ForecastItem>,
        failure: Option<ForecastError>,
        requests: Mutex<Vec<(LocationQuery, usize)>>,
    }

    impl StubSource {
        fn with_days(days: Vec<ForecastItem>) -> Arc<Self> {
            Arc::new(Self {
                days,
                failure: None,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(error: ForecastError) -> Arc<Self> {
            Arc::new(Self {
                days: Vec::new(),
                failure: Some(error),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ForecastSource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn get_forecast(
            &self,
            location: &LocationQuery,
            days: usize,
            _units: UnitSystem,
        ) -> Result<ForecastData, ForecastError> {
            self.requests.lock().unwrap().push((location.clone(), days));
            if let Some(err) = &self.failure {
                return Err(err.clone());
            }
            Ok(ForecastData {
                location: "Stubville".to_string(),
                forecast: self.days.iter().take(days).cloned().collect(),
            })
        }

        async fn get_current_weather(
            &self,
            _location: &LocationQuery,
            _units: UnitSystem,
        ) -> Result<CurrentWeather, ForecastError> {
            Err(ForecastError::LocationNotFound)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn day_sample(offset: i64, wind: f64, description: &str) -> ForecastItem {
        ForecastItem {
            date: today() + chrono::Duration::days(offset),
            temperature: 16.0,
            feels_like: 15.0,
            humidity: 70.0,
            wind_speed: wind,
            description: description.to_string(),
            unit: TemperatureUnit::Celsius,
            icon_url: "https://openweathermap.org/img/wn/02d@2x.png".to_string(),
        }
    }

    fn five_days() -> Vec<ForecastItem> {
        vec![
            day_sample(0, 10.0, "few clouds"),
            day_sample(1, 3.0, "clear sky"),
            day_sample(2, 10.0, "light rain"),
            day_sample(3, 30.0, "few clouds"),
            day_sample(4, 12.0, "thunderstorm"),
        ]
    }

    fn input(location: &str, date: &str) -> SprayingAdviceInput {
        SprayingAdviceInput {
            location: Some(location.to_string()),
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn service(source: Arc<StubSource>) -> SprayingAdvisorService {
        SprayingAdvisorService::new(source, SprayingThresholds::default())
    }

    #[tokio::test]
    async fn test_today_uses_first_sample() {
        let source = StubSource::with_days(five_days());
        let advice = assert_ok!(service(source.clone()).get_advice_on(input("Leeds", "today"), today()).await);

        assert_eq!(advice.status, SprayingStatus::Good);
        assert_eq!(advice.reasons, vec![OPTIMAL_CONDITIONS_REASON.to_string()]);
        assert_eq!(advice.location, "Leeds");
        assert_eq!(advice.date, today());
        assert_eq!(
            source.requests.lock().unwrap().as_slice(),
            &[(LocationQuery::Name("Leeds".into()), 1)]
        );
    }

    #[tokio::test]
    async fn test_tomorrow_requests_two_days() {
        let source = StubSource::with_days(five_days());
        let advice = assert_ok!(service(source.clone()).get_advice_on(input("Leeds", "tomorrow"), today()).await);

        assert_eq!(advice.status, SprayingStatus::Caution);
        assert_eq!(advice.details.wind_speed, 3.0);
        assert_eq!(source.requests.lock().unwrap()[0].1, 2);
    }

    #[tokio::test]
    async fn test_far_future_date_clamps_to_last_day() {
        let source = StubSource::with_days(five_days());
        let advice = assert_ok!(service(source.clone()).get_advice_on(input("Leeds", "2026-10-25"), today()).await);

        assert_eq!(advice.date, today() + chrono::Duration::days(4));
        assert_eq!(advice.details.rain_probability, 80);
        assert_eq!(advice.status, SprayingStatus::Unsuitable);
        assert_eq!(source.requests.lock().unwrap()[0].1, 5);
    }

    #[tokio::test]
    async fn test_past_date_clamps_to_today() {
        let source = StubSource::with_days(five_days());
        let advice = assert_ok!(service(source).get_advice_on(input("Leeds", "2026-10-01"), today()).await);
        assert_eq!(advice.date, today());
    }

    #[tokio::test]
    async fn test_evening_hour_triggers_inversion() {
        let source = StubSource::with_days(five_days());
        let advice = assert_ok!(
            service(source).get_advice_on(input("Leeds", "2026-10-16T20:00"), today()).await
        );
        assert_eq!(advice.status, SprayingStatus::Caution);
        assert_eq!(advice.reasons.len(), 2);
    }

    #[tokio::test]
    async fn test_bare_date_calm_day_warns_of_inversion() {
        let source = StubSource::with_days(five_days());
        let svc = service(source);

        for date in ["2026-10-16", "tomorrow", "2026-10-16T00:00"] {
            let advice = assert_ok!(svc.get_advice_on(input("Leeds", date), today()).await);
            assert_eq!(advice.status, SprayingStatus::Caution);
            assert_eq!(advice.reasons.len(), 2, "date {}", date);
            assert_eq!(advice.reasons[1], INVERSION_RISK_REASON);
        }
    }

    #[tokio::test]
    async fn test_midday_hour_on_calm_day_has_no_inversion() {
        let source = StubSource::with_days(five_days());
        let advice = assert_ok!(
            service(source).get_advice_on(input("Leeds", "2026-10-16T12:00"), today()).await
        );
        assert_eq!(advice.reasons.len(), 1);
    }

    #[tokio::test]
    async fn test_short_forecast_is_unavailable() {
        let source = StubSource::with_days(five_days().into_iter().take(2).collect());
        let err = assert_err!(service(source).get_advice_on(input("Leeds", "2026-10-18"), today()).await);

        match err {
            AdvisoryError::ForecastUnavailable { message, source } => {
                assert!(message.contains("2026-10-18"));
                assert!(message.contains("Leeds"));
                assert!(source.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_source_failure_is_propagated() {
        let source = StubSource::failing(ForecastError::LocationNotFound);
        let err = assert_err!(service(source).get_advice_on(input("Atlantis", "today"), today()).await);

        assert_eq!(
            err,
            AdvisoryError::ForecastUnavailable {
                message: "Could not get weather data for spraying advice: Location not found. Please check the spelling or coordinates.".to_string(),
                source: Some(ForecastError::LocationNotFound),
            }
        );
    }

    #[tokio::test]
    async fn test_validation_happens_before_fetch() {
        let source = StubSource::with_days(five_days());
        let svc = service(source.clone());

        let missing_date = SprayingAdviceInput {
            location: Some("Leeds".into()),
            ..Default::default()
        };
        let err = assert_err!(svc.get_advice_on(missing_date, today()).await);
        assert!(matches!(err, AdvisoryError::InvalidInput { ref field, .. } if field == "date"));

        let missing_location = SprayingAdviceInput {
            date: Some("today".into()),
            ..Default::default()
        };
        let err = assert_err!(svc.get_advice_on(missing_location, today()).await);
        assert!(matches!(err, AdvisoryError::InvalidInput { ref field, .. } if field == "location"));

        assert!(source.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_coordinates_label_the_advice() {
        let source = StubSource::with_days(five_days());
        let request = SprayingAdviceInput {
            latitude: Some(Decimal::from_str("18.7883").unwrap()),
            longitude: Some(Decimal::from_str("98.9853").unwrap()),
            date: Some("today".into()),
            ..Default::default()
        };
        let advice = assert_ok!(service(source).get_advice_on(request, today()).await);
        assert_eq!(advice.location, "lat:18.7883,lon:98.9853");
    }

    #[tokio::test]
    async fn test_repeated_evaluation_is_identical() {
        let source = StubSource::with_days(five_days());
        let svc = service(source);
        let first = assert_ok!(svc.get_advice_on(input("Leeds", "2026-10-17"), today()).await);
        let second = assert_ok!(svc.get_advice_on(input("Leeds", "2026-10-17"), today()).await);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
