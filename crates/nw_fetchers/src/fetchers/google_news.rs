use async_trait::async_trait;
use chrono::Utc;
use nw_core::time::timestamp_or;
use nw_core::{Article, NewsConfig, Result};
use reqwest::Client;
use tracing::debug;

use super::feed::extract_entries;
use super::utils::{endpoint, get_checked};
use super::Fetcher;

/// Google News RSS search feed. Needs no credential, so it is always tried.
#[derive(Debug, Clone, Default)]
pub struct GoogleNewsFeedFetcher;

impl GoogleNewsFeedFetcher {
    fn locale_params(config: &NewsConfig) -> Vec<(&'static str, String)> {
        let language = config.language.to_lowercase();
        let country = config.country.to_uppercase();
        vec![
            ("q", config.query.clone()),
            ("hl", format!("{}-{}", language, country)),
            ("gl", country.clone()),
            ("ceid", format!("{}:{}", country, language)),
        ]
    }
}

#[async_trait]
impl Fetcher for GoogleNewsFeedFetcher {
    fn name(&self) -> &'static str {
        "Google News"
    }

    async fn fetch_articles(&self, client: &Client, config: &NewsConfig) -> Result<Vec<Article>> {
        let url = endpoint(self.name(), &config.feed_url, "", &Self::locale_params(config))?;
        let xml = get_checked(client, self.name(), url).await?.text().await?;

        let fetched_at = Utc::now();
        let articles: Vec<Article> = extract_entries(&xml, config.page_size)
            .into_iter()
            .map(|entry| Article {
                title: entry.title,
                description: entry.description,
                url: entry.link,
                image: None,
                source: entry.source.unwrap_or_else(|| self.name().to_string()),
                published_at: timestamp_or(entry.pub_date.as_deref(), fetched_at),
            })
            .collect();

        debug!(count = articles.len(), "Fetched Google News feed entries");
        Ok(articles)
    }
}
