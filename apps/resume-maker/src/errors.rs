use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::editor::PathError;
use crate::export::ExportError;
use crate::persistence::{RemoteError, SaveInProgress};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("{0}")]
    SaveInProgress(#[from] SaveInProgress),

    #[error("Remote save failed: {0}")]
    RemoteSave(#[from] RemoteError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidPath(e) => (StatusCode::BAD_REQUEST, "INVALID_PATH", e.to_string()),
            AppError::SaveInProgress(e) => (StatusCode::CONFLICT, "SAVE_IN_PROGRESS", e.to_string()),
            AppError::RemoteSave(e) => {
                tracing::warn!("Remote save error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "REMOTE_SAVE_FAILED",
                    e.user_message().to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    "The PDF could not be generated".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
