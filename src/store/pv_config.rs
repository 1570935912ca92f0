//! PV system configuration record.
//!
//! Three labelled lines, written as submitted:
//!
//! ```text
//! Panel Area: <v>
//! Panel Efficiency: <v>
//! Inverter Efficiency: <v>
//! ```
//!
//! Saving never validates ranges. Values only have to be numeric once the
//! energy predictor loads them.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::{FileSlot, RecordSlot};

const AREA_LABEL: &str = "Panel Area";
const PANEL_EFFICIENCY_LABEL: &str = "Panel Efficiency";
const INVERTER_EFFICIENCY_LABEL: &str = "Inverter Efficiency";

#[derive(Debug, Error)]
pub enum PvConfigError {
    #[error("PV system configuration has not been submitted")]
    Missing,
    #[error("PV configuration is missing '{0}'")]
    MissingField(&'static str),
    #[error("PV configuration value for '{field}' is not a number: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("Failed to read PV configuration: {0}")]
    Io(#[from] io::Error),
}

/// Configuration as submitted, kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvConfigRecord {
    pub area: String,
    pub panel_efficiency: String,
    pub inverter_efficiency: String,
}

impl PvConfigRecord {
    fn to_text(&self) -> String {
        format!(
            "{}: {}\n{}: {}\n{}: {}\n",
            AREA_LABEL,
            self.area,
            PANEL_EFFICIENCY_LABEL,
            self.panel_efficiency,
            INVERTER_EFFICIENCY_LABEL,
            self.inverter_efficiency
        )
    }
}

/// Numeric configuration used by the energy predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PvConfig {
    /// Panel area in m²
    pub area_m2: f64,
    /// Panel efficiency as a fraction (0.18 = 18%)
    pub panel_efficiency: f64,
    /// Inverter efficiency as a fraction
    pub inverter_efficiency: f64,
}

/// Efficiencies above 1 are taken as percentages.
fn efficiency_fraction(v: f64) -> f64 {
    if v > 1.0 {
        v / 100.0
    } else {
        v
    }
}

fn labelled_value<'a>(contents: &'a str, label: &'static str) -> Result<&'a str, PvConfigError> {
    contents
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == label)
        .map(|(_, value)| value.trim())
        .ok_or(PvConfigError::MissingField(label))
}

fn labelled_number(contents: &str, label: &'static str) -> Result<f64, PvConfigError> {
    let raw = labelled_value(contents, label)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PvConfigError::InvalidValue {
            field: label,
            value: raw.to_string(),
        })
}

/// Parse the text of a PV configuration record.
pub fn parse_record(contents: &str) -> Result<PvConfig, PvConfigError> {
    Ok(PvConfig {
        area_m2: labelled_number(contents, AREA_LABEL)?,
        panel_efficiency: efficiency_fraction(labelled_number(contents, PANEL_EFFICIENCY_LABEL)?),
        inverter_efficiency: efficiency_fraction(labelled_number(
            contents,
            INVERTER_EFFICIENCY_LABEL,
        )?),
    })
}

/// Process-wide store for the PV system configuration.
#[derive(Clone)]
pub struct PvConfigStore {
    slot: Arc<dyn RecordSlot>,
}

impl PvConfigStore {
    pub fn new(slot: Arc<dyn RecordSlot>) -> Self {
        Self { slot }
    }

    pub fn on_disk(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileSlot::new(path)))
    }

    /// Overwrite the record unconditionally.
    pub fn save(&self, record: &PvConfigRecord) -> io::Result<()> {
        self.slot.write(&record.to_text())?;
        tracing::info!(
            "Saved PV configuration: area={} panel_eff={} inverter_eff={}",
            record.area,
            record.panel_efficiency,
            record.inverter_efficiency
        );
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.slot.exists()
    }

    pub fn load(&self) -> Result<PvConfig, PvConfigError> {
        let contents = self.slot.read()?.ok_or(PvConfigError::Missing)?;
        parse_record(&contents)
    }
}
