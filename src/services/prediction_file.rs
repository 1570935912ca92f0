//! Canonical prediction CSV (`HourOrderAndEstimated.csv`).
//!
//! The file is the only durable form of the latest prediction run. Every run
//! overwrites it completely; readers always go back to the file.
//!
//! ```text
//! Hour,Estimated Energy
//! 1,0.0
//! 2,0.4125
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::helpers::{dec_to_f64, round_decimal_fixed, round_f64};

/// Header line of the canonical prediction CSV.
pub const PREDICTION_CSV_HEADER: &str = "Hour,Estimated Energy";

/// Decimal places kept for each hourly value on write.
const ENERGY_DECIMAL_PLACES: usize = 4;

/// Decimal places of the displayed total.
const TOTAL_DECIMAL_PLACES: u32 = 2;

/// One hour of the itemized prediction, as served by `/energy_data`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyEstimate {
    /// 1-based hour index within the prediction window
    #[serde(rename = "Hour")]
    pub hour: u32,
    /// Estimated energy for the hour in kWh
    #[serde(rename = "Estimated_Energy")]
    pub estimated_energy_kwh: f64,
}

/// One row of the aggregate view, keeping the value exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    pub hour: u32,
    /// Value text as it appears in the CSV
    pub estimated_energy: String,
    pub estimated_energy_kwh: f64,
}

impl From<&HourlyEstimate> for PredictionRow {
    fn from(estimate: &HourlyEstimate) -> Self {
        Self {
            hour: estimate.hour,
            estimated_energy: estimate.estimated_energy_kwh.to_string(),
            estimated_energy_kwh: estimate.estimated_energy_kwh,
        }
    }
}

/// Sum of `Estimated Energy`, rounded to 2 decimal places.
///
/// Exact when every value fits a Decimal; values outside Decimal's range are
/// summed as f64.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyTotal {
    Exact(Decimal),
    Approximate(f64),
}

impl EnergyTotal {
    pub fn as_f64(&self) -> f64 {
        match self {
            EnergyTotal::Exact(d) => dec_to_f64(*d),
            EnergyTotal::Approximate(v) => *v,
        }
    }
}

impl fmt::Display for EnergyTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyTotal::Exact(d) => write!(f, "{}", d),
            EnergyTotal::Approximate(v) => write!(f, "{:.*}", TOTAL_DECIMAL_PLACES as usize, v),
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Aggregate view: every row plus the total.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTotals {
    pub rows: Vec<PredictionRow>,
    pub total_kwh: EnergyTotal,
}

impl PredictionTotals {
    pub fn from_rows(rows: Vec<PredictionRow>) -> Self {
        let exact = rows.iter().try_fold(Decimal::ZERO, |acc, row| {
            parse_decimal(&row.estimated_energy).and_then(|d| acc.checked_add(d))
        });
        let total_kwh = match exact {
            Some(sum) => EnergyTotal::Exact(round_decimal_fixed(sum, TOTAL_DECIMAL_PLACES)),
            None => {
                let sum: f64 = rows.iter().map(|r| r.estimated_energy_kwh).sum();
                tracing::debug!("Energy total outside Decimal range, summing as f64");
                EnergyTotal::Approximate(round_f64(sum, TOTAL_DECIMAL_PLACES as usize))
            }
        };
        Self { rows, total_kwh }
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Hour")]
    hour: u32,
    #[serde(rename = "Estimated Energy")]
    estimated_energy: String,
}

/// Create `path` with only `header` if it does not exist yet.
///
/// Returns `true` when the file was created. Existing files are left alone.
pub fn ensure_csv(path: &Path, header: &str) -> std::io::Result<bool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(mut file) => {
            writeln!(file, "{}", header)?;
            tracing::info!("Created empty CSV {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

/// 1-based hour for the estimate at `idx`.
fn hour_number(idx: usize) -> Result<u32, AppError> {
    idx.checked_add(1)
        .and_then(|hour| u32::try_from(hour).ok())
        .ok_or_else(|| AppError::InternalError(format!("Too many hourly estimates: {}", idx)))
}

/// Overwrite the canonical CSV with one row per estimate.
///
/// Hours are numbered from 1 in input order; values are rounded to 4 decimal
/// places. An empty slice produces a header-only file.
pub fn write_predictions(path: &Path, estimates: &[f64]) -> Result<Vec<HourlyEstimate>, AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(PREDICTION_CSV_HEADER.split(','))?;

    let mut written = Vec::with_capacity(estimates.len());
    for (idx, &value) in estimates.iter().enumerate() {
        let row = HourlyEstimate {
            hour: hour_number(idx)?,
            estimated_energy_kwh: round_f64(value, ENERGY_DECIMAL_PLACES),
        };
        writer.serialize((row.hour, row.estimated_energy_kwh))?;
        written.push(row);
    }
    writer.flush()?;

    tracing::info!(
        "Wrote {} hourly predictions to {}",
        written.len(),
        path.display()
    );
    Ok(written)
}

fn read_raw_rows(path: &Path) -> Result<Vec<RawRow>, AppError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.iter().collect::<Vec<_>>().join(",");
    if headers != PREDICTION_CSV_HEADER {
        return Err(AppError::InternalError(format!(
            "Unexpected header in {}: '{}'",
            path.display(),
            headers
        )));
    }

    reader
        .deserialize::<RawRow>()
        .map(|row| row.map_err(AppError::from))
        .collect()
}

fn invalid_value(hour: u32, value: &str) -> AppError {
    AppError::InternalError(format!(
        "Invalid Estimated Energy '{}' for hour {}",
        value, hour
    ))
}

fn read_rows(path: &Path) -> Result<Vec<PredictionRow>, AppError> {
    read_raw_rows(path)?
        .into_iter()
        .map(|raw| {
            let text = raw.estimated_energy.trim();
            let value = text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid_value(raw.hour, &raw.estimated_energy))?;
            Ok(PredictionRow {
                hour: raw.hour,
                estimated_energy: text.to_string(),
                estimated_energy_kwh: value,
            })
        })
        .collect()
}

/// Itemized read: every row in file order.
pub fn read_predictions(path: &Path) -> Result<Vec<HourlyEstimate>, AppError> {
    Ok(read_rows(path)?
        .into_iter()
        .map(|row| HourlyEstimate {
            hour: row.hour,
            estimated_energy_kwh: row.estimated_energy_kwh,
        })
        .collect())
}

/// Aggregate read: every row plus the sum of `Estimated Energy`.
///
/// Values are summed as written and only the total is rounded.
pub fn summarize_predictions(path: &Path) -> Result<PredictionTotals, AppError> {
    Ok(PredictionTotals::from_rows(read_rows(path)?))
}
