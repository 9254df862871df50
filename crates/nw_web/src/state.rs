use async_trait::async_trait;
use nw_core::{Article, Result};
use nw_fetchers::Aggregator;
use std::sync::Arc;

/// Anything that can produce the current aggregated article list.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn latest(&self) -> Result<Vec<Article>>;
}

#[async_trait]
impl NewsSource for Aggregator {
    async fn latest(&self) -> Result<Vec<Article>> {
        self.aggregate().await
    }
}

pub struct AppState {
    pub news: Arc<dyn NewsSource>,
}

impl AppState {
    pub fn new(news: Arc<dyn NewsSource>) -> Self {
        Self { news }
    }
}
