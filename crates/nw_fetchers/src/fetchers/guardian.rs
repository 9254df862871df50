use async_trait::async_trait;
use chrono::{Duration, Utc};
use nw_core::time::timestamp_or;
use nw_core::{Article, Error, NewsConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::utils::{decode_entities, endpoint, get_checked, non_empty, strip_html};
use super::Fetcher;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    results: Vec<GuardianResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianResult {
    web_title: Option<String>,
    web_url: Option<String>,
    web_publication_date: Option<String>,
    fields: Option<GuardianFields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianFields {
    trail_text: Option<String>,
    thumbnail: Option<String>,
}

/// Date-ranged search against the Guardian content API, newest first.
#[derive(Debug, Clone, Default)]
pub struct GuardianFetcher;

#[async_trait]
impl Fetcher for GuardianFetcher {
    fn name(&self) -> &'static str {
        "The Guardian"
    }

    fn is_enabled(&self, config: &NewsConfig) -> bool {
        config.guardian.is_enabled()
    }

    async fn fetch_articles(&self, client: &Client, config: &NewsConfig) -> Result<Vec<Article>> {
        let api_key = config
            .guardian
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("GUARDIAN_API_KEY is not set".to_string()))?;

        let fetched_at = Utc::now();
        let from_date = (fetched_at - Duration::days(config.lookback_days)).date_naive();

        let url = endpoint(
            self.name(),
            &config.guardian.base_url,
            "/search",
            &[
                ("q", config.query.clone()),
                ("from-date", from_date.format("%Y-%m-%d").to_string()),
                ("order-by", "newest".to_string()),
                ("page-size", config.page_size.to_string()),
                ("show-fields", "trailText,thumbnail".to_string()),
                ("api-key", api_key),
            ],
        )?;

        let body: SearchEnvelope = get_checked(client, self.name(), url).await?.json().await?;
        let response = body.response;
        if response.status.as_deref() == Some("error") {
            return Err(Error::provider(
                self.name(),
                response.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let articles: Vec<Article> = response
            .results
            .into_iter()
            .map(|r| {
                let fields = r.fields.unwrap_or_default();
                Article {
                    title: r.web_title.unwrap_or_default().trim().to_string(),
                    description: fields
                        .trail_text
                        .map(|t| strip_html(&decode_entities(&t)))
                        .unwrap_or_default(),
                    url: r.web_url.unwrap_or_default().trim().to_string(),
                    image: non_empty(fields.thumbnail),
                    source: self.name().to_string(),
                    published_at: timestamp_or(r.web_publication_date.as_deref(), fetched_at),
                }
            })
            .collect();

        debug!(count = articles.len(), %from_date, "Fetched Guardian articles");
        Ok(articles)
    }
}
