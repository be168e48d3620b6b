use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Message returned when a note lookup by id and owner comes back empty
pub const NOTE_NOT_FOUND_MESSAGE: &str = "Note not found or does not belong to the user";

const INVALID_BODY_MESSAGE: &str = "Invalid request body";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid request body: {0}")]
    BadRequest(String),
    #[error("Note not found or does not belong to the user")]
    NotFound,
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: supernote_core::Error,
    },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Map a core error from the operation that fails with `failure`.
    ///
    /// Validation and lookup misses keep their own status; everything else is a
    /// store failure reported under `failure`.
    pub fn store(failure: &'static str) -> impl FnOnce(supernote_core::Error) -> Self {
        move |error| match error {
            supernote_core::Error::InvalidInput(message) => Self::Validation(message),
            supernote_core::Error::NotFound(_) => Self::NotFound,
            source => Self::Store {
                message: failure,
                source,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(message) => {
                tracing::warn!(reason = %message, "Rejected note request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        message,
                        error: None,
                    },
                )
            }
            Self::BadRequest(detail) => {
                tracing::warn!(%detail, "Rejected malformed request body");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        message: INVALID_BODY_MESSAGE.to_string(),
                        error: Some(detail),
                    },
                )
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message: NOTE_NOT_FOUND_MESSAGE.to_string(),
                    error: None,
                },
            ),
            Self::Store { message, source } => {
                tracing::error!(error = %source, "{message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: message.to_string(),
                        error: Some(source.to_string()),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
