use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{middleware::bearer_token, password, session};
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::routes::AppState;

/// Both fields optional so a missing field is our 400, not a rejection
/// from the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn required(credentials: CredentialsRequest) -> AppResult<(String, String)> {
    match (credentials.username, credentials.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
        _ => Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        )),
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<impl IntoResponse> {
    let (username, pass) = required(body)?;

    let password_hash = password::hash_password(&pass)?;
    let user_id = Uuid::new_v4().to_string();

    let conn = state.db.get()?;
    let result = conn.execute(
        "INSERT INTO users (id, username, password_hash) VALUES (?1, ?2, ?3)",
        rusqlite::params![user_id, username, password_hash],
    );

    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(AppError::Conflict(
                "This username is already taken".to_string(),
            ));
        }
        Err(e) => return Err(AppError::Database(e)),
    }

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<impl IntoResponse> {
    let (username, pass) = required(body)?;

    let conn = state.db.get()?;
    let user_result = conn.query_row(
        "SELECT id, username, password_hash FROM users WHERE username = ?1",
        rusqlite::params![username],
        |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
            })
        },
    );

    let user = match user_result {
        Ok(u) => u,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(AppError::Unauthorized),
        Err(e) => return Err(AppError::Database(e)),
    };
    drop(conn);

    if !password::verify_password(&pass, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let sess = session::create_session(&state.db, &user.id)?;

    Ok(Json(json!({ "success": true, "token": sess.token })))
}

/// Deletes the session for the presented bearer token. Responds 200 even
/// when no token was sent or it was already invalid.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = bearer_token(&headers) {
        session::delete_session(&state.db, token)?;
    }
    Ok(Json(json!({ "success": true })))
}
