//! HTTP handlers for spraying advice

use axum::{extract::State, Json};
use shared::SprayingAdvice;

use crate::error::AppResult;
use crate::services::spraying::SprayingAdviceInput;
use crate::services::SprayingAdvisorService;
use crate::AppState;

/// Assess spraying conditions for a location and day
pub async fn get_spraying_advice(
    State(state): State<AppState>,
    Json(input): Json<SprayingAdviceInput>,
) -> AppResult<Json<SprayingAdvice>> {
    let service = SprayingAdvisorService::new(
        state.forecast_source.clone(),
        state.config.spraying.clone(),
    );
    let advice = service.get_advice(input).await?;
    Ok(Json(advice))
}
