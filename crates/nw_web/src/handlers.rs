use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use nw_core::Article;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::AppState;

/// Edges and browsers may reuse the aggregate for five minutes.
pub const NEWS_CACHE_CONTROL: &str = "public, max-age=300";

#[derive(Debug, Serialize, Deserialize)]
pub struct NewsEnvelope {
    pub data: Vec<Article>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub async fn list_news(State(state): State<Arc<AppState>>) -> Response {
    match state.news.latest().await {
        Ok(data) => (
            [(header::CACHE_CONTROL, NEWS_CACHE_CONTROL)],
            Json(NewsEnvelope { data }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "News aggregation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: e.to_string() }),
            )
                .into_response()
        }
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
