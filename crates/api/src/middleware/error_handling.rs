//! # Error Handling Middleware
//!
//! Maps booking errors to HTTP status codes and JSON error bodies. Validation
//! failures carry one entry per failing field so a client can flag all of
//! them at once.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotbook_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Expired(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::AlreadyClaimed(_) => StatusCode::CONFLICT,
            BookingError::Unauthorized(_) => StatusCode::FORBIDDEN,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self.0 {
            BookingError::Validation(errors) => json!({
                "error": "The given data was invalid.",
                "fields": errors.errors(),
            }),
            BookingError::Store(report) => {
                tracing::error!("Store failure: {:?}", report);
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
