//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::relay::RelayError;

// Errors

/// Convert `RelayError` into an Axum compatible response with a plain
/// text body.
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::InvalidInput => StatusCode::BAD_REQUEST,
            RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Upstream(_) | RelayError::Cancelled | RelayError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if let RelayError::Unexpected(e) = &self {
            tracing::error!("Chat handler error: {}. Root cause: {}", e, e.root_cause());
        }

        (status, self.to_string()).into_response()
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}
