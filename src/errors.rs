use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AppError {
    /// Message shown to clients, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::ExternalServiceError(msg)
            | AppError::InternalError(msg) => msg.clone(),
            AppError::Io(err) => err.to_string(),
            AppError::Csv(err) => err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) | AppError::Io(_) | AppError::Csv(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        (
            status,
            axum::Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

impl From<crate::store::coordinates::CoordinateError> for AppError {
    fn from(err: crate::store::coordinates::CoordinateError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<crate::store::pv_config::PvConfigError> for AppError {
    fn from(err: crate::store::pv_config::PvConfigError) -> Self {
        use crate::store::pv_config::PvConfigError;
        match err {
            PvConfigError::Io(e) => AppError::Io(e),
            missing @ PvConfigError::Missing => AppError::BadRequest(missing.to_string()),
            other => AppError::InternalError(other.to_string()),
        }
    }
}
