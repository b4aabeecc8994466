//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error with HTTP status code
#[derive(Debug, Clone, Serialize, Error)]
pub struct ApiError {
    /// HTTP status code
    #[serde(skip)]
    pub status: StatusCode,

    /// Error message
    pub message: String,

    /// Optional error code for client handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    /// Create a new API error with code
    pub fn with_code(
        status: StatusCode,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::NOT_FOUND, message, "NOT_FOUND")
    }

    /// 409 Conflict
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::CONFLICT, message, "CONFLICT")
    }


    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_ERROR",
        )
    }

    /// 502 Bad Gateway
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_GATEWAY, message, "UPSTREAM_ERROR")
    }

    /// 503 Service Unavailable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::SERVICE_UNAVAILABLE,
            message,
            "SERVICE_UNAVAILABLE",
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{:?}] [{}] {}", self.status, code, self.message),
            None => write!(f, "[{:?}] {}", self.status, self.message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.message,
            "code": self.code,
        }));

        (self.status, body).into_response()
    }
}

impl From<sessao::Error> for ApiError {
    fn from(e: sessao::Error) -> Self {
        match e {
            sessao::Error::NotFound(_) => Self::not_found("Sessão não encontrada ou expirada"),
            sessao::Error::Finished(_) => Self::conflict("Sessão já finalizada"),
        }
    }
}

impl From<conversa::Error> for ApiError {
    fn from(e: conversa::Error) -> Self {
        match e {
            conversa::Error::Session(e) => e.into(),
            conversa::Error::MissingApiKey => {
                Self::unavailable("Assistente indisponível: chave da API não configurada")
            }
            conversa::Error::InvalidPattern(message) => Self::internal(message),
            other => {
                error!("Chat backend failure: {}", other);
                Self::bad_gateway("Falha ao consultar o assistente; tente novamente em instantes")
            }
        }
    }
}
