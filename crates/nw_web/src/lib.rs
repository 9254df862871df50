use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::{AppState, NewsSource};

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/news", get(handlers::list_news))
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "Serving news API");
    axum::serve(listener, create_app(state)).await
}

pub mod prelude {
    pub use crate::{create_app, AppState, NewsSource};
    pub use nw_core::{Article, Error, Result};
}
