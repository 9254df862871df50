use async_trait::async_trait;
use nw_core::{Article, NewsConfig, Result};
use reqwest::Client;
use std::sync::Arc;

pub mod feed;
pub mod gnews;
pub mod google_news;
pub mod guardian;
pub mod newsapi;

pub use gnews::GNewsFetcher;
pub use google_news::GoogleNewsFeedFetcher;
pub use guardian::GuardianFetcher;
pub use newsapi::NewsApiFetcher;

/// One external content provider, normalized into canonical [`Article`]s.
///
/// Implementations may fail freely; the aggregator converts every failure
/// into an empty contribution.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Human-readable provider name used in logs and listings.
    fn name(&self) -> &'static str;

    /// Disabled fetchers are skipped without any network call.
    fn is_enabled(&self, _config: &NewsConfig) -> bool {
        true
    }

    /// Queries the provider and maps its response into articles.
    async fn fetch_articles(&self, client: &Client, config: &NewsConfig) -> Result<Vec<Article>>;
}

/// Result of running a single fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Items(Vec<Article>),
    Disabled,
    Failed(String),
}

impl FetchOutcome {
    pub fn into_articles(self) -> Vec<Article> {
        match self {
            FetchOutcome::Items(articles) => articles,
            FetchOutcome::Disabled | FetchOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FetchOutcome::Items(articles) => articles.len(),
            FetchOutcome::Disabled | FetchOutcome::Failed(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub type SharedFetcher = Arc<dyn Fetcher>;

/// Every provider in declared order. The order decides which copy of a
/// duplicated article survives and how equal timestamps are ordered.
pub fn default_fetchers() -> Vec<SharedFetcher> {
    vec![
        Arc::new(NewsApiFetcher),
        Arc::new(GuardianFetcher),
        Arc::new(GNewsFetcher),
        Arc::new(GoogleNewsFeedFetcher),
    ]
}

/// Common utilities for fetchers
pub(crate) mod utils {
    use lazy_static::lazy_static;
    use nw_core::{Error, Result};
    use regex::Regex;
    use reqwest::{Client, Response};
    use url::Url;

    lazy_static! {
        static ref HTML_TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
        static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
        static ref NUMERIC_ENTITY_RE: Regex = Regex::new(r"&#([xX]?)([0-9a-fA-F]+);").unwrap();
    }

    pub fn endpoint(provider: &str, base: &str, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}{}", base.trim_end_matches('/'), path);
        Url::parse_with_params(&raw, params)
            .map_err(|e| Error::Config(format!("Invalid {} endpoint {}: {}", provider, raw, e)))
    }

    /// Sends a GET and turns any non-2xx status into a provider error.
    pub async fn get_checked(client: &Client, provider: &str, url: Url) -> Result<Response> {
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::provider(provider, format!("HTTP {}", status)));
        }
        Ok(response)
    }

    pub fn non_empty(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn decode_entities(text: &str) -> String {
        let numeric = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
            let radix = if caps[1].is_empty() { 10 } else { 16 };
            u32::from_str_radix(&caps[2], radix)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        });
        numeric
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
    }

    /// Removes markup and collapses whitespace.
    pub fn strip_html(text: &str) -> String {
        let without_tags = HTML_TAG_RE.replace_all(text, " ");
        WHITESPACE_RE.replace_all(&without_tags, " ").trim().to_string()
    }
}
