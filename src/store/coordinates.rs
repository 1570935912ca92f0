//! Coordinate record: the most recently submitted latitude/longitude.
//!
//! Stored as a single line `Latitude: <lat>, Longitude: <lon>`. Reads are
//! best-effort: an absent or malformed record never fails the caller.

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use super::{FileSlot, RecordSlot};

const LATITUDE_LABEL: &str = "Latitude: ";
const LONGITUDE_LABEL: &str = "Longitude: ";

/// Validation failures for submitted coordinates.
///
/// The display strings are shown to users verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("Please enter both latitude and longitude.")]
    Missing,
    #[error("Latitude and longitude must be numbers.")]
    NotNumeric,
    #[error("Please input number between -90 to 90 for latitude and -180 to 180 for longitude.")]
    OutOfRange,
}

/// A validated WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees, -90..=90
    pub latitude: f64,
    /// Longitude in degrees, -180..=180
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NotNumeric);
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::OutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse coordinates from form text. Empty or missing fields are rejected
    /// before numeric parsing.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Result<Self, CoordinateError> {
        let lat = latitude.map(str::trim).filter(|s| !s.is_empty());
        let lon = longitude.map(str::trim).filter(|s| !s.is_empty());
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(CoordinateError::Missing);
        };

        let lat: f64 = lat.parse().map_err(|_| CoordinateError::NotNumeric)?;
        let lon: f64 = lon.parse().map_err(|_| CoordinateError::NotNumeric)?;
        Self::new(lat, lon)
    }

    fn to_record(self) -> String {
        format!(
            "{}{}, {}{}\n",
            LATITUDE_LABEL, self.latitude, LONGITUDE_LABEL, self.longitude
        )
    }
}

/// Outcome of reading the coordinate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoordinateLookup {
    /// No record has been written yet.
    Absent,
    /// A record exists but does not contain two comma-separated fields.
    Malformed,
    /// Fields as stored, with labels stripped.
    Found { latitude: String, longitude: String },
}

impl CoordinateLookup {
    /// Fields for display; absent and malformed records both show as empty.
    pub fn display_fields(&self) -> (Option<&str>, Option<&str>) {
        match self {
            CoordinateLookup::Found {
                latitude,
                longitude,
            } => (Some(latitude.as_str()), Some(longitude.as_str())),
            CoordinateLookup::Absent | CoordinateLookup::Malformed => (None, None),
        }
    }
}

/// Parse the text of a coordinate record.
pub fn parse_record(contents: &str) -> CoordinateLookup {
    let stripped = contents
        .trim()
        .replace(LATITUDE_LABEL, "")
        .replace(LONGITUDE_LABEL, "");
    let mut parts = stripped.split(',');

    match (parts.next(), parts.next()) {
        (Some(lat), Some(lon)) => CoordinateLookup::Found {
            latitude: lat.trim().to_string(),
            longitude: lon.trim().to_string(),
        },
        _ => CoordinateLookup::Malformed,
    }
}

/// Process-wide store for the last submitted coordinates.
#[derive(Clone)]
pub struct CoordinateStore {
    slot: Arc<dyn RecordSlot>,
}

impl CoordinateStore {
    pub fn new(slot: Arc<dyn RecordSlot>) -> Self {
        Self { slot }
    }

    pub fn on_disk(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileSlot::new(path)))
    }

    /// Overwrite the record with `coordinate`.
    pub fn save(&self, coordinate: Coordinate) -> io::Result<()> {
        self.slot.write(&coordinate.to_record())?;
        tracing::debug!(
            "Saved coordinates lat={} lon={}",
            coordinate.latitude,
            coordinate.longitude
        );
        Ok(())
    }

    pub fn load(&self) -> CoordinateLookup {
        match self.slot.read() {
            Ok(Some(contents)) => parse_record(&contents),
            Ok(None) => CoordinateLookup::Absent,
            Err(e) => {
                tracing::warn!("Failed to read coordinate record: {}", e);
                CoordinateLookup::Absent
            }
        }
    }
}
