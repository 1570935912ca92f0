use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when healthy, "degraded" when the data directory is unusable)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether a file could be created in the data directory
    pub data_dir_writable: bool,
    /// Whether a PV configuration has been submitted
    pub pv_config_present: bool,
}

/// Create and drop an anonymous file in `path`.
fn dir_writable(path: &std::path::Path) -> bool {
    match tempfile::tempfile_in(path) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Data directory {} is not writable: {}", path.display(), e);
            false
        }
    }
}

/// Health check endpoint.
///
/// Returns status "degraded" (still 200) if the data directory is missing or
/// read-only.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let writable = dir_writable(&state.data_dir);

    Json(HealthResponse {
        status: if writable {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_dir_writable: writable,
        pv_config_present: state.pv_config.exists(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::state_in;

    #[tokio::test]
    async fn test_degraded_without_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), "http://127.0.0.1:9");

        let Json(resp) = health_check(State(state)).await;
        assert_eq!(resp.status, "degraded");
        assert!(!resp.data_dir_writable);
        assert!(!resp.pv_config_present);
    }

    #[tokio::test]
    async fn test_ok_with_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), "http://127.0.0.1:9");
        std::fs::create_dir_all(&state.data_dir).unwrap();

        let Json(resp) = health_check(State(state.clone())).await;
        assert_eq!(resp.status, "ok");
        assert!(resp.data_dir_writable);
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));

        // probe file is removed again
        assert_eq!(std::fs::read_dir(&state.data_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_degraded_when_data_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), "http://127.0.0.1:9");
        std::fs::write(&state.data_dir, "not a directory").unwrap();

        let Json(resp) = health_check(State(state)).await;
        assert_eq!(resp.status, "degraded");
        assert!(!resp.data_dir_writable);
    }
}
