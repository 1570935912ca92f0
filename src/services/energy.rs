//! Hourly PV energy estimation from an irradiance series.
//!
//! Each sample is treated as the mean irradiance over one hour, so
//!
//! ```text
//! energy_kwh = irradiance_w_m2 × area_m2 × panel_eff × inverter_eff / 1000
//! ```

use crate::services::irradiance::IrradianceSeries;
use crate::store::pv_config::PvConfig;

/// Watts per kilowatt; one-hour samples make W the same as Wh.
const WATTS_PER_KILOWATT: f64 = 1000.0;

/// Estimated AC energy for one hour, in kWh.
pub fn hourly_energy_kwh(irradiance_w_m2: f64, config: &PvConfig) -> f64 {
    let irradiance = irradiance_w_m2.max(0.0);
    irradiance * config.area_m2 * config.panel_efficiency * config.inverter_efficiency
        / WATTS_PER_KILOWATT
}

/// One estimate per irradiance sample, in sample order.
pub fn predict_hourly_energy(series: &IrradianceSeries, config: &PvConfig) -> Vec<f64> {
    let estimates: Vec<f64> = series
        .samples
        .iter()
        .map(|s| hourly_energy_kwh(s.solar_radiation, config))
        .collect();

    tracing::debug!(
        "Predicted {} hours, peak {:.4} kWh",
        estimates.len(),
        estimates.iter().copied().fold(0.0, f64::max)
    );
    estimates
}
