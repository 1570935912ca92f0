//! Prediction read endpoints.
//!
//! - GET /energy_data: itemized JSON
//! - GET /results: HTML table with total
//! - GET /data/HourOrderAndEstimated.csv: canonical CSV download
//! - GET /data/solar_radiation_data.csv: irradiance CSV download
//!
//! Every call re-reads the files; nothing is cached.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use std::path::Path;

use crate::errors::{AppError, ErrorResponse};
use crate::services::irradiance::IRRADIANCE_CSV_HEADER;
use crate::services::prediction_file::{
    ensure_csv, read_predictions, summarize_predictions, HourlyEstimate, PREDICTION_CSV_HEADER,
};
use crate::state::AppState;
use crate::views::{render_error, render_results};

/// Get the latest hourly predictions.
#[utoipa::path(
    get,
    path = "/energy_data",
    tag = "Predictions",
    responses(
        (status = 200, description = "Hourly predictions in hour order", body = Vec<HourlyEstimate>),
        (status = 500, description = "Prediction file missing or malformed", body = ErrorResponse),
    )
)]
pub async fn get_energy_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<HourlyEstimate>>, AppError> {
    let rows = read_predictions(&state.predictions_csv)
        .map_err(|e| AppError::InternalError(e.message()))?;
    Ok(Json(rows))
}

/// Results page: every hour plus the total.
pub async fn show_results(State(state): State<AppState>) -> Response {
    match summarize_predictions(&state.predictions_csv) {
        Ok(totals) => Html(render_results(&totals)).into_response(),
        Err(e) => {
            tracing::warn!("Results page unavailable: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error(&e.message())),
            )
                .into_response()
        }
    }
}

/// Serve a CSV file, creating a header-only file first if it is absent.
fn serve_csv(path: &Path, header_line: &str) -> Result<Response, AppError> {
    ensure_csv(path, header_line)?;
    let body = std::fs::read(path)?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], body).into_response())
}

/// Download the canonical prediction CSV.
#[utoipa::path(
    get,
    path = "/data/HourOrderAndEstimated.csv",
    tag = "Predictions",
    responses(
        (status = 200, description = "Prediction CSV (header-only when no run has happened)", content_type = "text/csv", body = String),
        (status = 500, description = "File could not be created or read", body = ErrorResponse),
    )
)]
pub async fn download_predictions_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    serve_csv(&state.predictions_csv, PREDICTION_CSV_HEADER)
}

/// Download the irradiance CSV written by the last fetch.
#[utoipa::path(
    get,
    path = "/data/solar_radiation_data.csv",
    tag = "Predictions",
    responses(
        (status = 200, description = "Irradiance CSV (header-only when nothing was fetched)", content_type = "text/csv", body = String),
        (status = 500, description = "File could not be created or read", body = ErrorResponse),
    )
)]
pub async fn download_irradiance_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    serve_csv(&state.irradiance_csv, IRRADIANCE_CSV_HEADER)
}
