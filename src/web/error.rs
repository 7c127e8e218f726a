//! Mapping of fetch outcomes to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use thiserror::Error;

use crate::data::HiveError;

/// Errors a route handler can answer with
#[derive(Debug, Error)]
pub enum AppError {
    /// The requested post or account does not exist
    #[error("{0}")]
    NotFound(&'static str),

    /// The upstream call still failed after all retries
    #[error("Error fetching {what} from Hive community")]
    Upstream {
        what: &'static str,
        #[source]
        source: HiveError,
    },
}

impl AppError {
    /// Wraps an upstream failure for the given kind of content
    pub fn upstream(what: &'static str, source: HiveError) -> Self {
        AppError::Upstream { what, source }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Upstream { what, source } = &self {
            error!("Error fetching {}: {}", what, source);
        }
        (self.status(), self.to_string()).into_response()
    }
}
