use std::path::PathBuf;

use crate::config::AppConfig;
use crate::services::irradiance::IrradianceClient;
use crate::store::coordinates::CoordinateStore;
use crate::store::pv_config::PvConfigStore;

/// Shared application state.
///
/// Every field is a handle to process-wide storage; handlers never cache
/// file contents between requests.
#[derive(Clone)]
pub struct AppState {
    pub coordinates: CoordinateStore,
    pub pv_config: PvConfigStore,
    pub irradiance_client: IrradianceClient,
    /// Canonical prediction CSV
    pub predictions_csv: PathBuf,
    /// Irradiance dataset written by the fetch stage
    pub irradiance_csv: PathBuf,
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            coordinates: CoordinateStore::on_disk(&config.coords_file),
            pv_config: PvConfigStore::on_disk(&config.pv_config_file),
            irradiance_client: IrradianceClient::new(
                &config.irradiance_api_url,
                &config.user_agent,
            ),
            predictions_csv: config.predictions_csv(),
            irradiance_csv: config.irradiance_csv(),
            data_dir: config.data_dir.clone(),
        }
    }
}
