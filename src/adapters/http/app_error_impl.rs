use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::Unauthorized => {
                error_resp(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, None)
            }
            AppError::Conflict(msg) => {
                error_resp(StatusCode::CONFLICT, ErrorCode::Conflict, Some(msg))
            }
            AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, Some(msg))
            }
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, None),
            AppError::Registry(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::RegistryError,
                None,
            ),
            AppError::ProviderConfigMissing => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::ProviderConfigMissing,
                Some("Edge provider configuration is missing".into()),
            ),
            AppError::ProviderConflict { message, detail } => {
                // The provider's own diagnostic rides along for support.
                let body = serde_json::json!({
                    "code": ErrorCode::ProviderConflict.as_str(),
                    "message": message,
                    "error": detail,
                });
                (StatusCode::CONFLICT, Json(body)).into_response()
            }
            AppError::ProviderUnavailable(msg) => error_resp(
                StatusCode::BAD_GATEWAY,
                ErrorCode::ProviderUnavailable,
                Some(msg),
            ),
            AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                None,
            ),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
