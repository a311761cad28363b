mod auth;
mod config;
mod db;
mod error;
mod models;
mod routes;
mod store;

use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use config::Config;
use routes::{create_router, AppState};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shoplist_server=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();
    let port = config.server_port;

    // Create database pool and run migrations
    let pool = db::create_pool(&config.sqlite_path);
    tracing::info!("Database initialized at {}", config.sqlite_path);

    let list_store = store::build(&config, pool.clone());
    tracing::info!("List store strategy: {:?}", config.store_mode);

    let state = AppState {
        db: pool,
        config: config.clone(),
        list_store,
    };

    // Build router with middleware
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = format!("0.0.0.0:{port}");
    tracing::info!("shoplist-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    // Connect info feeds the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server failed");
}
