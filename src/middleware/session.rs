use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::errors::AppError;
use crate::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

/// Extractor for endpoints behind the login gate.
///
/// Reads the session id from `Authorization: Bearer <id>` or `X-Session-Id`
/// and resolves it against the session store. Missing, malformed, unknown or
/// expired ids are rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub id: Uuid,
    pub username: String,
}

fn session_token(req: &HttpRequest) -> Option<&str> {
    let headers = req.headers();
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim());
        }
    }
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

impl FromRequest for AuthenticatedSession {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = session_token(req).map(str::to_string);

        Box::pin(async move {
            let state = state.ok_or(AppError::StateMissing)?;
            let token = token.ok_or(AppError::MissingSession)?;
            let id = Uuid::parse_str(&token).map_err(|_| AppError::InvalidSession)?;

            let session = state
                .sessions
                .touch(&id)
                .await
                .ok_or(AppError::InvalidSession)?;

            Ok(AuthenticatedSession {
                id: session.id,
                username: session.username,
            })
        })
    }
}
