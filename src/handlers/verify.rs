use actix_web::{web, HttpResponse, Result};
use validator::Validate;

use crate::middleware::AuthenticatedSession;
use crate::models::{ErrorResponse, VerifyRequest};
use crate::services::VerifyError;
use crate::AppState;

pub async fn verify(
    state: web::Data<AppState>,
    session: AuthenticatedSession,
    req: web::Json<VerifyRequest>,
) -> Result<HttpResponse> {
    // Validate request
    if let Err(e) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "Invalid request",
            format!("Validation error: {}", e),
        )));
    }

    let response = match state.verify_service.verify(&req.query, req.max_results).await {
        Ok(response) => response,
        Err(VerifyError::EmptyQuery) => {
            return Ok(HttpResponse::BadRequest().json(ErrorResponse::with_details(
                "Invalid request",
                VerifyError::EmptyQuery.to_string(),
            )));
        }
    };

    // Recorded after the search, whatever its outcome.
    if !state.sessions.record_query(&session.id, &req.query).await {
        tracing::warn!(session_id = %session.id, "session ended before query could be recorded");
    }

    Ok(HttpResponse::Ok().json(response))
}
