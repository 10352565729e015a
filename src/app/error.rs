use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed input; never reaches the database.
    #[error("{0}")]
    Validation(String),

    #[error("Not connected to database. Please connect first.")]
    NotConnected,

    #[error("Dashboard not found")]
    NotFound,

    /// Driver failure: auth, network, timeout.
    #[error("{context}")]
    Upstream {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn upstream(context: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| ApiError::Upstream { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::NotConnected => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotConnected => "not_connected",
            ApiError::NotFound => "not_found",
            ApiError::Upstream { .. } => "upstream_error",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            ApiError::Upstream { context, source } => {
                let detail = format!("{source:#}");
                tracing::error!(error = %detail, "{context}");
                Some(detail)
            }
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
            details,
        };
        (self.status(), Json(body)).into_response()
    }
}
