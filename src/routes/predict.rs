//! POST /predict: run a prediction for coordinates and a time window.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::services::prediction::{run_prediction, PredictionInput};
use crate::state::AppState;

/// Prediction request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    /// Latitude in degrees (number or numeric string)
    #[serde(default)]
    #[schema(value_type = f64)]
    pub latitude: serde_json::Value,
    /// Longitude in degrees (number or numeric string)
    #[serde(default)]
    #[schema(value_type = f64)]
    pub longitude: serde_json::Value,
    /// Window start, e.g. "2025-05-19T22:00" (UTC) or RFC 3339
    pub start_datetime: Option<String>,
    /// Window end, inclusive
    pub end_datetime: Option<String>,
}

/// Prediction run summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    pub message: String,
    /// Number of hourly rows written
    pub hours: usize,
    /// Total estimated energy in kWh, rounded to 2 decimal places
    pub total_kwh: f64,
}

/// Fetch irradiance, predict hourly energy and overwrite the prediction CSV.
#[utoipa::path(
    post,
    path = "/predict",
    tag = "Predictions",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Prediction completed", body = PredictResponse),
        (status = 400, description = "Invalid coordinates, time window or missing PV configuration", body = ErrorResponse),
        (status = 500, description = "Failed to persist results", body = ErrorResponse),
        (status = 502, description = "Irradiance service error", body = ErrorResponse),
    )
)]
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let input = PredictionInput::from_fields(
        &req.latitude,
        &req.longitude,
        req.start_datetime.as_deref(),
        req.end_datetime.as_deref(),
    )?;

    let outcome = run_prediction(&state, input).await?;

    Ok(Json(PredictResponse {
        message: "Prediction completed successfully.".to_string(),
        hours: outcome.hours,
        total_kwh: outcome.total_kwh,
    }))
}
