use std::path::PathBuf;

/// Default Open-Meteo forecast endpoint used for irradiance lookups.
const DEFAULT_IRRADIANCE_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Directory holding the prediction and irradiance CSV files.
    pub data_dir: PathBuf,
    /// Single-line record of the last submitted coordinates.
    pub coords_file: PathBuf,
    /// PV system configuration record.
    pub pv_config_file: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    pub irradiance_api_url: String,
    pub user_agent: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            data_dir: env_path("DATA_DIR", "./data"),
            coords_file: env_path("COORDS_FILE", "./coords.txt"),
            pv_config_file: env_path("PV_CONFIG_FILE", "./pv_config.txt"),
            static_dir: env_path("STATIC_DIR", "./static"),
            irradiance_api_url: std::env::var("IRRADIANCE_API_URL")
                .unwrap_or_else(|_| DEFAULT_IRRADIANCE_API_URL.to_string()),
            user_agent: std::env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| format!("pv-forecast-api/{}", env!("CARGO_PKG_VERSION"))),
        }
    }

    /// Canonical prediction CSV (latest run only).
    pub fn predictions_csv(&self) -> PathBuf {
        self.data_dir.join("HourOrderAndEstimated.csv")
    }

    /// Irradiance dataset written by the fetch stage.
    pub fn irradiance_csv(&self) -> PathBuf {
        self.data_dir.join("solar_radiation_data.csv")
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(std::env::var(key).unwrap_or_else(|_| default.to_string()))
}
