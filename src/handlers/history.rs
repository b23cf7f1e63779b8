use actix_web::{web, HttpResponse, Result};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::AuthenticatedSession;
use crate::models::{ErrorResponse, HistoryQuery, HistoryResponse};
use crate::AppState;

pub async fn history(
    state: web::Data<AppState>,
    session: AuthenticatedSession,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = query.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "Invalid request",
            format!("Validation error: {}", e),
        )));
    }

    let limit = query
        .limit
        .unwrap_or(state.config.session.history_display_limit);

    match state.sessions.recent_queries(&session.id, limit).await {
        Some((entries, total)) => Ok(HttpResponse::Ok().json(HistoryResponse { entries, total })),
        None => Err(AppError::InvalidSession.into()),
    }
}
