//! PV system configuration endpoints.
//!
//! - POST /submit_pv: overwrite the configuration
//! - GET /check_pv_config: whether a configuration exists

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::helpers::json_to_text;
use crate::state::AppState;
use crate::store::pv_config::PvConfigRecord;

/// PV configuration body. Values are stored as given, without range checks.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PvConfigRequest {
    /// Panel area in m²
    #[serde(default)]
    #[schema(value_type = f64)]
    pub area: serde_json::Value,
    /// Panel efficiency, fraction or percent
    #[serde(default)]
    #[schema(value_type = f64)]
    pub panel_efficiency: serde_json::Value,
    /// Inverter efficiency, fraction or percent
    #[serde(default)]
    #[schema(value_type = f64)]
    pub inverter_efficiency: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PvConfigStatus {
    /// Whether a PV configuration has been saved
    pub exists: bool,
}

/// Save the PV system configuration.
#[utoipa::path(
    post,
    path = "/submit_pv",
    tag = "PV configuration",
    request_body = PvConfigRequest,
    responses(
        (status = 200, description = "Configuration saved", body = MessageResponse),
        (status = 400, description = "A field is missing", body = ErrorResponse),
    )
)]
pub async fn submit_pv(
    State(state): State<AppState>,
    Json(req): Json<PvConfigRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (Some(area), Some(panel_efficiency), Some(inverter_efficiency)) = (
        json_to_text(&req.area),
        json_to_text(&req.panel_efficiency),
        json_to_text(&req.inverter_efficiency),
    ) else {
        return Err(AppError::BadRequest(
            "area, panel_efficiency and inverter_efficiency are required".to_string(),
        ));
    };

    state.pv_config.save(&PvConfigRecord {
        area,
        panel_efficiency,
        inverter_efficiency,
    })?;

    Ok(Json(MessageResponse {
        message: "PV system configuration saved successfully.".to_string(),
    }))
}

/// Check whether a PV configuration has been saved.
#[utoipa::path(
    get,
    path = "/check_pv_config",
    tag = "PV configuration",
    responses(
        (status = 200, description = "Existence of the PV configuration", body = PvConfigStatus),
    )
)]
pub async fn check_pv_config(State(state): State<AppState>) -> Json<PvConfigStatus> {
    Json(PvConfigStatus {
        exists: state.pv_config.exists(),
    })
}
