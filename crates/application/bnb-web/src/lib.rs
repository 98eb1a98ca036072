//! Airbnb listing browser: server-rendered pages over the property dataset
//!
//! - **Pages**: askama templates sharing one layout, no client-side framework
//! - **Data**: every data page asks [`AppState::snapshot`] for the current
//!   `Arc<[Property]>` and runs a `bnb_core::query` function over it
//! - **Static files**: the public directory is served at the root, with the
//!   404 page as its fallback

pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;
pub mod views;

use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let public = ServeDir::new(&state.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    let pages = Router::new()
        .route("/", get(handlers::index))
        .route("/users", get(handlers::users))
        .route("/all-data", get(handlers::all_data))
        .route("/data/{index}", get(handlers::property_at))
        .route("/search/id", get(handlers::search_id_form))
        .route("/search/property/result", get(handlers::search_id_result))
        .route("/search/name", get(handlers::search_name_form))
        .route("/search/name/result", get(handlers::search_name_result))
        .route("/viewData", get(handlers::view_data))
        .route("/viewData/clean", get(handlers::view_data_clean))
        .route("/viewData/price", get(handlers::price_form))
        .route("/viewData/price/result", get(handlers::price_result));

    let api = Router::new()
        .route("/api/health", get(handlers::api_health))
        .route("/api/properties", get(handlers::api_properties))
        .route("/admin/reload", post(handlers::admin_reload));

    Router::new()
        .merge(pages)
        .merge(api)
        .fallback_service(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server and run until Ctrl-C
pub async fn serve(state: Arc<AppState>, addr: &str) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listing browser listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
