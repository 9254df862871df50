use async_trait::async_trait;
use chrono::Utc;
use nw_core::time::timestamp_or;
use nw_core::{Article, Error, NewsConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::utils::{endpoint, get_checked, non_empty};
use super::Fetcher;

/// NewsAPI marks articles pulled by the publisher with this title.
const REMOVED_MARKER: &str = "[Removed]";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

/// Keyword search against NewsAPI's `/v2/everything`.
#[derive(Debug, Clone, Default)]
pub struct NewsApiFetcher;

#[async_trait]
impl Fetcher for NewsApiFetcher {
    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    fn is_enabled(&self, config: &NewsConfig) -> bool {
        config.newsapi.is_enabled()
    }

    async fn fetch_articles(&self, client: &Client, config: &NewsConfig) -> Result<Vec<Article>> {
        let api_key = config
            .newsapi
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("NEWSAPI_API_KEY is not set".to_string()))?;

        let url = endpoint(
            self.name(),
            &config.newsapi.base_url,
            "/v2/everything",
            &[
                ("q", config.query.clone()),
                ("language", config.language.clone()),
                ("sortBy", "publishedAt".to_string()),
                ("pageSize", config.page_size.to_string()),
                ("apiKey", api_key),
            ],
        )?;

        let body: EverythingResponse = get_checked(client, self.name(), url).await?.json().await?;
        if body.status.as_deref() == Some("error") {
            return Err(Error::provider(
                self.name(),
                body.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let fetched_at = Utc::now();
        let articles: Vec<Article> = body
            .articles
            .into_iter()
            .filter(|a| a.title.as_deref() != Some(REMOVED_MARKER))
            .map(|a| Article {
                title: a.title.unwrap_or_default().trim().to_string(),
                description: a.description.unwrap_or_default().trim().to_string(),
                url: a.url.unwrap_or_default().trim().to_string(),
                image: non_empty(a.url_to_image),
                source: a
                    .source
                    .and_then(|s| non_empty(s.name))
                    .unwrap_or_else(|| self.name().to_string()),
                published_at: timestamp_or(a.published_at.as_deref(), fetched_at),
            })
            .collect();

        debug!(count = articles.len(), "Fetched NewsAPI articles");
        Ok(articles)
    }
}
