pub mod error;
pub mod routes;
pub mod state;
pub mod verify;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum Router with all routes and middleware. Used by `serve()`
/// and available for in-process testing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/interactions", post(routes::interactions::post_interaction))
        .route("/healthz", get(routes::health::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the interactions endpoint until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("interactions endpoint listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
