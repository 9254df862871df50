use async_trait::async_trait;
use chrono::Utc;
use nw_core::time::timestamp_or;
use nw_core::{Article, Error, NewsConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::utils::{endpoint, get_checked, non_empty};
use super::Fetcher;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
    source: Option<GNewsSource>,
}

#[derive(Debug, Deserialize)]
struct GNewsSource {
    name: Option<String>,
}

/// Keyword search on GNews, scoped by country and language.
#[derive(Debug, Clone, Default)]
pub struct GNewsFetcher;

#[async_trait]
impl Fetcher for GNewsFetcher {
    fn name(&self) -> &'static str {
        "GNews"
    }

    fn is_enabled(&self, config: &NewsConfig) -> bool {
        config.gnews.is_enabled()
    }

    async fn fetch_articles(&self, client: &Client, config: &NewsConfig) -> Result<Vec<Article>> {
        let api_key = config
            .gnews
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("GNEWS_API_KEY is not set".to_string()))?;

        let url = endpoint(
            self.name(),
            &config.gnews.base_url,
            "/api/v4/search",
            &[
                ("q", config.query.clone()),
                ("lang", config.language.clone()),
                ("country", config.country.clone()),
                ("max", config.page_size.to_string()),
                ("apikey", api_key),
            ],
        )?;

        let body: SearchResponse = get_checked(client, self.name(), url).await?.json().await?;

        let fetched_at = Utc::now();
        let articles: Vec<Article> = body
            .articles
            .into_iter()
            .map(|a| Article {
                title: a.title.unwrap_or_default().trim().to_string(),
                description: a.description.unwrap_or_default().trim().to_string(),
                url: a.url.unwrap_or_default().trim().to_string(),
                image: non_empty(a.image),
                source: a
                    .source
                    .and_then(|s| non_empty(s.name))
                    .unwrap_or_else(|| self.name().to_string()),
                published_at: timestamp_or(a.published_at.as_deref(), fetched_at),
            })
            .collect();

        debug!(count = articles.len(), "Fetched GNews articles");
        Ok(articles)
    }
}
