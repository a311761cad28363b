use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::session;
use crate::error::AppError;
use crate::routes::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Require a valid bearer session and inject the resolved `User` into the
/// request extensions. Missing, malformed, unknown, and expired tokens are
/// all the same 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or(AppError::Unauthorized)?
        .to_string();

    let (_session, user) = session::validate_session(&state.db, &token)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
