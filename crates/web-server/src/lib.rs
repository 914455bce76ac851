//! # Tradebook Web Server
//!
//! The JSON API behind the journal's pages. Identity comes from headers set by
//! the authentication proxy (`x-user-id`, optionally `x-user-email`); every
//! handler reads and writes through the `JournalStore` held in `AppState`.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use configuration::Config;
use database::JournalStore;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod extract;
pub mod handlers;

use handlers::{account, dashboard, library, trades, university};

/// The shared application state that all handlers can access.
pub struct AppState {
    pub store: Arc<dyn JournalStore>,
    pub config: Config,
}

/// Builds the full `/api` router with CORS, request tracing and a body limit.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/profile", post(account::upsert_profile))
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/reports/:kind", get(dashboard::get_report))
        .route("/api/trades", get(trades::list_trades).post(trades::create_trade))
        .route(
            "/api/trades/:id",
            get(trades::get_trade).put(trades::update_trade).delete(trades::delete_trade),
        )
        .route("/api/playbooks", get(library::list_playbooks).post(library::create_playbook))
        .route("/api/playbooks/:id", delete(library::delete_playbook))
        .route("/api/journal", get(library::list_journal).post(library::create_journal_entry))
        .route("/api/journal/:id", delete(library::delete_journal_entry))
        .route("/api/university", get(university::get_university))
        .route("/api/university/:section", post(university::add_item))
        .route(
            "/api/university/:section/:index",
            put(university::update_item).delete(university::delete_item),
        )
        .route("/api/settings", get(account::get_settings).put(account::put_settings))
        .route("/api/export", get(account::export_data))
        .route("/api/import", post(account::import_data))
        .route("/api/reset", post(account::reset_data))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 10))
}

/// Binds the configured address and serves the API until the process exits.
pub async fn run_server(config: Config, store: Arc<dyn JournalStore>) -> anyhow::Result<()> {
    let addr = config.server_address();
    let app = build_router(Arc::new(AppState { store, config }));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
