use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::QuoteError;

/// Failed `/cotacao` request. Only the status reaches the caller.
#[derive(Debug)]
pub struct HandlerError(pub QuoteError);

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            QuoteError::DeadlineExceeded { .. } => StatusCode::REQUEST_TIMEOUT,
            QuoteError::Decode(_)
            | QuoteError::Network(_)
            | QuoteError::Storage(_)
            | QuoteError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QuoteError> for HandlerError {
    fn from(err: QuoteError) -> Self {
        HandlerError(err)
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}
