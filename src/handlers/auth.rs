use actix_web::{web, HttpResponse, Result};
use validator::Validate;

use crate::middleware::AuthenticatedSession;
use crate::models::{ErrorResponse, LoginRequest, LoginResponse};
use crate::AppState;

pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    // Validate request
    if let Err(e) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "Invalid request",
            format!("Validation error: {}", e),
        )));
    }

    if !state.credentials.verify(&req.username, &req.password) {
        tracing::warn!(username = %req.username, "login rejected");
        return Ok(HttpResponse::Unauthorized().json(ErrorResponse::new(
            "Invalid credentials",
        )));
    }

    let session = state.sessions.create(&req.username).await;
    tracing::info!(session_id = %session.id, username = %session.username, "login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        session_id: session.id,
        username: session.username,
    }))
}

pub async fn logout(
    state: web::Data<AppState>,
    session: AuthenticatedSession,
) -> Result<HttpResponse> {
    state.sessions.remove(&session.id).await;
    tracing::info!(session_id = %session.id, "session ended");
    Ok(HttpResponse::NoContent().finish())
}
