//! Prediction run: coordinates + time window in, canonical CSV out.
//!
//! Stages, in order:
//! 1. validate the request (no side effects on failure)
//! 2. save the coordinates
//! 3. fetch irradiance (writes the irradiance CSV, returns the series)
//! 4. predict hourly energy from that series and the PV configuration
//! 5. overwrite the canonical prediction CSV
//!
//! Any failure aborts the run before step 5, so the previous prediction CSV
//! stays in place. Nothing after the write can fail the run.

use serde_json::Value;

use crate::errors::AppError;
use crate::helpers::json_to_f64;
use crate::services::energy::predict_hourly_energy;
use crate::services::irradiance::TimeWindow;
use crate::services::prediction_file::{write_predictions, PredictionRow, PredictionTotals};
use crate::state::AppState;
use crate::store::coordinates::Coordinate;

/// Validated input of a prediction run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInput {
    pub coordinate: Coordinate,
    pub window: TimeWindow,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    /// Number of hourly rows written
    pub hours: usize,
    /// Sum of the written values, rounded to 2 decimal places
    pub total_kwh: f64,
}

impl PredictionInput {
    /// Validate raw request fields. Latitude/longitude may be numbers or
    /// numeric strings.
    pub fn from_fields(
        latitude: &Value,
        longitude: &Value,
        start_datetime: Option<&str>,
        end_datetime: Option<&str>,
    ) -> Result<Self, AppError> {
        if latitude.is_null() || longitude.is_null() {
            return Err(AppError::BadRequest(
                "Latitude and longitude are required".to_string(),
            ));
        }
        let (Some(lat), Some(lon)) = (json_to_f64(latitude), json_to_f64(longitude)) else {
            return Err(AppError::BadRequest(
                "Latitude and longitude must be numbers.".to_string(),
            ));
        };
        let coordinate = Coordinate::new(lat, lon)?;
        let window = TimeWindow::parse(start_datetime, end_datetime)?;

        Ok(Self { coordinate, window })
    }
}

/// Run the full prediction pipeline for `input`.
pub async fn run_prediction(
    state: &AppState,
    input: PredictionInput,
) -> Result<PredictionOutcome, AppError> {
    state.coordinates.save(input.coordinate)?;

    let series = state
        .irradiance_client
        .fetch_and_store(input.coordinate, input.window, &state.irradiance_csv)
        .await?;

    let pv_config = state.pv_config.load()?;
    let estimates = predict_hourly_energy(&series, &pv_config);

    std::fs::create_dir_all(&state.data_dir)?;
    let written = write_predictions(&state.predictions_csv, &estimates)?;
    let totals =
        PredictionTotals::from_rows(written.iter().map(PredictionRow::from).collect());

    tracing::info!(
        "Prediction run complete: {} hours, {} kWh total",
        written.len(),
        totals.total_kwh
    );

    Ok(PredictionOutcome {
        hours: written.len(),
        total_kwh: totals.total_kwh.as_f64(),
    })
}
