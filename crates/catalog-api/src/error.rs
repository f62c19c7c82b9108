use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, info};

use catalog_common::error::CatalogError;
use product_filter::FilterError;

const INTERNAL_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing or invalid bearer token")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Filter(FilterError::InvalidArgument(message)) => {
                info!(message = %message, "rejected filter request");
                json_error(StatusCode::BAD_REQUEST, "invalid_argument", message)
            }
            AppError::InvalidCredentials => {
                json_error(StatusCode::UNAUTHORIZED, "unauthorized", "Invalid credentials")
            }
            AppError::Unauthorized => json_error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing or invalid bearer token",
            ),
            other => {
                error!(error = %other, "request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", INTERNAL_MESSAGE)
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
