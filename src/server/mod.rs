mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::geocode::{Geocoder, NominatimClient};

pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/parse", get(handlers::parse))
        .route("/api/geocode", post(handlers::geocode))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(config: &AppConfig) -> std::io::Result<()> {
    let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimClient::new(config.geocoder.clone()));
    let state = Arc::new(AppState {
        geocoder,
        batch: config.batch.clone(),
    });
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("adres server listening on http://{}", addr);
    info!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
