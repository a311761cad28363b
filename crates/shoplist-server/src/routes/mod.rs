mod auth;
mod list;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::auth::middleware::require_auth;
use crate::config::{Config, StoreMode};
use crate::db::DbPool;
use crate::error::AppError;
use crate::store::ListStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub list_store: Arc<dyn ListStore>,
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

pub fn create_router(state: AppState) -> Router {
    // Rate limit: auth routes, 10 requests per 60 seconds per IP
    let auth_governor = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .finish()
        .unwrap();

    // Rate limit: list API, 120 requests per 60 seconds per IP
    let api_governor = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(120)
        .finish()
        .unwrap();

    let health_routes = Router::new().route("/health", get(health));

    let auth_routes = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .layer(GovernorLayer::new(Arc::new(auth_governor)));

    // /api/saved_items is the blob variant's historical endpoint; both paths
    // land on the same save handler.
    let mut list_routes = Router::new()
        .route("/api/list", get(list::get_list).post(list::save_list))
        .route("/api/saved_items", put(list::save_list));

    // Blob mode is single-tenant: no session check on the list routes.
    if state.config.store_mode == StoreMode::Relational {
        list_routes = list_routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));
    }
    let list_routes = list_routes.layer(GovernorLayer::new(Arc::new(api_governor)));

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(list_routes)
        .fallback(not_found)
        .with_state(state)
}
