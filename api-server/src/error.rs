//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use aerorisk_core::PipelineError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// Artifacts failed to load at startup; the service is up but cannot
    /// score anything.
    ModelUnavailable,

    /// A request record failed type or range validation.
    ValidationError(String),

    /// Anything else - never exposes internals to the caller.
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::ModelUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Modelo não está disponível. Execute o gerador de modelo para criar os artefatos.",
            ),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno ao processar a predição")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput { column, reason } => {
                ApiError::ValidationError(format!("campo '{}': {}", column, reason))
            }
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(validation_detail(&errors))
    }
}

/// Flatten validation errors into one message naming the offending fields.
pub fn validation_detail(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "valor inválido".to_string());
            format!("campo '{}': {}", field, reason)
        })
        .collect::<Vec<_>>()
        .join("; ")
}
