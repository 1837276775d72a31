use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorResponse;

const INTERNAL_ERROR: &str = "Erro interno do servidor";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid JSON body: {0}")]
    MalformedJson(String),
    #[error("JSON body must be an object or an array")]
    UnsupportedJson,
    #[error("failed to read request body: {0}")]
    Body(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        internal_error(self.to_string())
    }
}

/// Renders a handler panic the same way as any other internal error.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(error = %message, "handler panicked");
    internal_error(message)
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: INTERNAL_ERROR,
            message,
        }),
    )
        .into_response()
}
