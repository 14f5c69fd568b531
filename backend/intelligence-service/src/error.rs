use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntelligenceError>;

#[derive(Debug, Error)]
pub enum IntelligenceError {
    /// Connectivity loss reading the event or order store. Not recovered
    /// locally; the caller answers with a 5xx.
    #[error("{store} store unavailable: {message}")]
    StoreUnavailable { store: &'static str, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntelligenceError {
    pub fn store(store: &'static str, err: impl std::fmt::Display) -> Self {
        IntelligenceError::StoreUnavailable {
            store,
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for IntelligenceError {
    fn error_response(&self) -> HttpResponse {
        let code = self.status_code();
        HttpResponse::build(code).json(ErrorResponse {
            error: self.to_string(),
            code: code.as_u16(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            IntelligenceError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            IntelligenceError::NotFound(_) => StatusCode::NOT_FOUND,
            IntelligenceError::Validation(_) => StatusCode::BAD_REQUEST,
            IntelligenceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_unavailable_maps_to_503() {
        let err = IntelligenceError::store("event", "connection refused");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("event store unavailable"));
    }
}
