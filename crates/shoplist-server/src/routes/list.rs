use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::{Item, ItemInput, User};
use crate::routes::AppState;
use crate::store::Scope;

/// The identity a request operates as. In relational mode the auth
/// middleware has resolved a user; in blob mode the list routes are public
/// and the store works on the global list.
pub struct RequestScope(Scope);

impl<S> FromRequestParts<S> for RequestScope
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scope = match parts.extensions.get::<User>() {
            Some(user) => Scope::User(user.id.clone()),
            None => Scope::Global,
        };
        Ok(RequestScope(scope))
    }
}

pub async fn get_list(
    State(state): State<AppState>,
    RequestScope(scope): RequestScope,
) -> AppResult<Json<Vec<Item>>> {
    let items = state.list_store.get(&scope)?;
    Ok(Json(items))
}

/// Save the full client list. The body must be a JSON array of items; the
/// configured store decides whether that means merge-by-id or wholesale
/// replacement.
pub async fn save_list(
    State(state): State<AppState>,
    RequestScope(scope): RequestScope,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Response> {
    let values = match body {
        serde_json::Value::Array(values) => values,
        _ => {
            return Err(AppError::BadRequest(
                "Request body must be a JSON array of items".to_string(),
            ))
        }
    };

    let items: Vec<ItemInput> = values
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::BadRequest(format!("Malformed item: {e}")))?;

    // Store failures get downgraded to a structured 500 here rather than
    // the generic error body; clients key off the success flag.
    match state.list_store.save(&scope, items) {
        Ok(_) => Ok(Json(json!({ "success": true })).into_response()),
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => {
            tracing::error!("Failed to save list: {e}");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response())
        }
    }
}
