//! Open-Meteo hourly irradiance client.
//!
//! Fetches `shortwave_radiation` (global horizontal irradiance, W/m²) for a
//! location and hour range, writes it to the irradiance CSV and hands the
//! series back to the caller.
//! See: https://open-meteo.com/en/docs

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::errors::AppError;
use crate::store::coordinates::Coordinate;

/// Header line of the irradiance CSV.
pub const IRRADIANCE_CSV_HEADER: &str = "timestamp,solar_radiation";

/// Hour format accepted by Open-Meteo's `start_hour` / `end_hour`.
const OPEN_METEO_HOUR_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Timestamp format of the irradiance CSV (`2025-05-19 22:00:00+00:00`).
const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Accepted input formats for naive (timezone-less) datetimes, read as UTC.
const NAIVE_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Client for the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct IrradianceClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

/// Hour range to fetch, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One hourly irradiance value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceSample {
    pub timestamp: DateTime<Utc>,
    /// Global horizontal irradiance in W/m², mean over the preceding hour
    pub solar_radiation: f64,
}

/// Hourly irradiance in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IrradianceSeries {
    pub samples: Vec<IrradianceSample>,
}

// --- Open-Meteo JSON response types ---

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    hourly: Option<OpenMeteoHourly>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoHourly {
    time: Vec<String>,
    #[serde(default)]
    shortwave_radiation: Vec<Option<f64>>,
}

/// Parse a user-supplied datetime: RFC 3339, or a naive datetime taken as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl TimeWindow {
    /// Build a window from the two request fields.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());
        let (Some(start_raw), Some(end_raw)) = (start, end) else {
            return Err(AppError::BadRequest(
                "start_datetime and end_datetime are required".to_string(),
            ));
        };

        let start = parse_datetime(start_raw).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid start_datetime: '{}'", start_raw))
        })?;
        let end = parse_datetime(end_raw)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid end_datetime: '{}'", end_raw)))?;

        if start > end {
            return Err(AppError::BadRequest(
                "start_datetime must not be after end_datetime".to_string(),
            ));
        }
        Ok(Self { start, end })
    }
}

fn parse_open_meteo_hour(raw: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), OPEN_METEO_HOUR_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Convert an Open-Meteo JSON payload into an irradiance series.
///
/// Pure function (no I/O). Missing radiation values are carried as 0.0 so
/// the series stays one sample per hour.
pub fn parse_irradiance_response(raw_json: &serde_json::Value) -> Result<IrradianceSeries, AppError> {
    let response: OpenMeteoResponse = serde_json::from_value(raw_json.clone()).map_err(|e| {
        AppError::ExternalServiceError(format!("Open-Meteo response structure error: {}", e))
    })?;

    let Some(hourly) = response.hourly else {
        return Err(AppError::ExternalServiceError(
            "Open-Meteo response has no hourly data".to_string(),
        ));
    };

    let mut samples = Vec::with_capacity(hourly.time.len());
    for (idx, time) in hourly.time.iter().enumerate() {
        let timestamp = parse_open_meteo_hour(time).ok_or_else(|| {
            AppError::ExternalServiceError(format!("Open-Meteo returned invalid time '{}'", time))
        })?;
        let solar_radiation = match hourly.shortwave_radiation.get(idx).copied().flatten() {
            Some(value) => value,
            None => {
                tracing::warn!("No shortwave_radiation for {}, using 0", time);
                0.0
            }
        };
        samples.push(IrradianceSample {
            timestamp,
            solar_radiation,
        });
    }

    Ok(IrradianceSeries { samples })
}

/// Overwrite the irradiance CSV with `series`.
pub fn write_irradiance_csv(path: &Path, series: &IrradianceSeries) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(IRRADIANCE_CSV_HEADER.split(','))?;
    for sample in &series.samples {
        writer.serialize((
            sample.timestamp.format(CSV_TIMESTAMP_FORMAT).to_string(),
            sample.solar_radiation,
        ))?;
    }
    writer.flush()?;
    Ok(())
}

impl IrradianceClient {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Fetch hourly irradiance for `coordinate` over `window`.
    pub async fn fetch_irradiance(
        &self,
        coordinate: Coordinate,
        window: TimeWindow,
    ) -> Result<IrradianceSeries, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| AppError::InternalError(format!("Invalid User-Agent: {}", e)))?,
        );

        let response = self
            .client
            .get(&self.base_url)
            .headers(headers)
            .query(&[
                ("latitude", coordinate.latitude.to_string()),
                ("longitude", coordinate.longitude.to_string()),
                ("hourly", "shortwave_radiation".to_string()),
                ("timezone", "UTC".to_string()),
                (
                    "start_hour",
                    window.start.format(OPEN_METEO_HOUR_FORMAT).to_string(),
                ),
                (
                    "end_hour",
                    window.end.format(OPEN_METEO_HOUR_FORMAT).to_string(),
                ),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Open-Meteo request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Open-Meteo returned HTTP {}: {}",
                status, body
            )));
        }

        let raw_json: serde_json::Value = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Open-Meteo JSON parse error: {}", e))
        })?;

        let series = parse_irradiance_response(&raw_json)?;
        tracing::info!(
            "Fetched {} hourly irradiance samples for lat={} lon={}",
            series.samples.len(),
            coordinate.latitude,
            coordinate.longitude
        );
        Ok(series)
    }

    /// Fetch irradiance and persist it to the irradiance CSV.
    ///
    /// The CSV is only touched once the upstream call has succeeded.
    pub async fn fetch_and_store(
        &self,
        coordinate: Coordinate,
        window: TimeWindow,
        csv_path: &Path,
    ) -> Result<IrradianceSeries, AppError> {
        let series = self.fetch_irradiance(coordinate, window).await?;
        write_irradiance_csv(csv_path, &series)?;
        Ok(series)
    }
}
