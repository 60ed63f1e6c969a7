//! HTTP error mapping.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::store::StoreError;

/// Error returned by API handlers. Rendered as `{ "error": "..." }`.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ApiError {
    /// A store operation failed.
    #[display("{}", _0)]
    Store(StoreError),

    /// The request body could not be decoded.
    #[display("Invalid request body: {}", _0)]
    Body(JsonRejection),

    /// A blocking worker failed to complete.
    #[display("Worker failed: {}", _0)]
    #[from(skip)]
    Worker(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::Validation(_) | StoreError::InvalidState(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Database(_)) | ApiError::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message exposed to the client. Server-side failures stay generic.
    fn public_message(&self) -> String {
        match self {
            ApiError::Store(StoreError::Database(_)) | ApiError::Worker(_) => {
                "Internal server error".to_string()
            }
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Store(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
