use actix_web::{error::InternalError, http::StatusCode, web, HttpResponse, ResponseError};

use crate::models::ErrorResponse;

/// Request-level failures that short-circuit before a handler body runs.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing session token")]
    MissingSession,

    #[error("invalid or expired session")]
    InvalidSession,

    #[error("application state not configured")]
    StateMissing,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingSession | AppError::InvalidSession => StatusCode::UNAUTHORIZED,
            AppError::StateMissing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::MissingSession | AppError::InvalidSession => {
                ErrorResponse::with_details("Unauthorized", self.to_string())
            }
            AppError::StateMissing => ErrorResponse::new("Internal server error"),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Body extractor settings that report deserialization failures as `ErrorResponse` JSON.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(ErrorResponse::with_details("Invalid request", err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Query-string counterpart of [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(ErrorResponse::with_details("Invalid request", err.to_string()));
        InternalError::from_response(err, response).into()
    })
}
