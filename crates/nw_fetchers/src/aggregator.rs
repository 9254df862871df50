use futures::future::join_all;
use nw_core::{Article, Error, NewsConfig, Result};
use reqwest::Client;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::fetchers::{default_fetchers, FetchOutcome, Fetcher, SharedFetcher};
use crate::pipeline;

/// Fans out to every registered fetcher and combines the results.
pub struct Aggregator {
    client: Client,
    config: Arc<NewsConfig>,
    fetchers: Vec<SharedFetcher>,
}

/// Per-provider result of one aggregation run, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReport {
    pub name: &'static str,
    pub outcome: FetchOutcome,
}

impl Aggregator {
    /// Aggregator over the default provider registry.
    pub fn new(config: Arc<NewsConfig>) -> Result<Self> {
        Ok(Self::with_fetchers(config, default_fetchers(), build_client()?))
    }

    pub fn with_fetchers(config: Arc<NewsConfig>, fetchers: Vec<SharedFetcher>, client: Client) -> Self {
        Self {
            client,
            config,
            fetchers,
        }
    }

    pub fn add_fetcher(&mut self, fetcher: SharedFetcher) {
        self.fetchers.push(fetcher);
    }

    pub fn fetchers(&self) -> &[SharedFetcher] {
        &self.fetchers
    }

    pub fn config(&self) -> &NewsConfig {
        &self.config
    }

    /// Runs every fetcher concurrently and waits for all of them.
    ///
    /// Reports come back in registration order no matter which fetcher
    /// finished first. Only a task that was cancelled before finishing is an
    /// error; fetcher failures, timeouts and panics are folded into
    /// [`FetchOutcome::Failed`].
    pub async fn fetch_all(&self) -> Result<Vec<ProviderReport>> {
        let handles: Vec<_> = self
            .fetchers
            .iter()
            .map(|fetcher| {
                let fetcher = Arc::clone(fetcher);
                let client = self.client.clone();
                let config = Arc::clone(&self.config);
                tokio::spawn(async move { run_fetcher(fetcher.as_ref(), &client, &config).await })
            })
            .collect();

        let joined = join_all(handles).await;

        let mut reports = Vec::with_capacity(joined.len());
        for (fetcher, result) in self.fetchers.iter().zip(joined) {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => {
                    warn!(provider = fetcher.name(), "Fetcher panicked; contributing no articles");
                    FetchOutcome::Failed("fetcher panicked".to_string())
                }
                Err(e) => {
                    return Err(Error::Pipeline(format!("{} task did not complete: {}", fetcher.name(), e)));
                }
            };
            reports.push(ProviderReport {
                name: fetcher.name(),
                outcome,
            });
        }

        Ok(reports)
    }

    /// The merged, deduplicated, newest-first article list.
    pub async fn aggregate(&self) -> Result<Vec<Article>> {
        let reports = self.fetch_all().await?;
        let fetched: usize = reports.iter().map(|r| r.outcome.len()).sum();
        let failed = reports
            .iter()
            .filter(|r| matches!(r.outcome, FetchOutcome::Failed(_)))
            .count();

        let articles = pipeline::combine(reports.into_iter().map(|r| r.outcome.into_articles()));
        info!(
            fetched,
            kept = articles.len(),
            failed_providers = failed,
            "Aggregated news articles"
        );
        Ok(articles)
    }
}

/// Runs one fetcher to completion, never failing.
///
/// A missing credential short-circuits to [`FetchOutcome::Disabled`] before
/// any request is made; errors and timeouts become [`FetchOutcome::Failed`].
pub async fn run_fetcher(fetcher: &dyn Fetcher, client: &Client, config: &NewsConfig) -> FetchOutcome {
    let name = fetcher.name();
    if !fetcher.is_enabled(config) {
        debug!(provider = name, "Provider not configured; skipping");
        return FetchOutcome::Disabled;
    }

    match timeout(config.provider_timeout, fetcher.fetch_articles(client, config)).await {
        Ok(Ok(articles)) => {
            debug!(provider = name, count = articles.len(), "Provider fetch succeeded");
            FetchOutcome::Items(articles)
        }
        Ok(Err(e)) => {
            warn!(provider = name, error = %e, "Provider fetch failed");
            FetchOutcome::Failed(e.to_string())
        }
        Err(_) => {
            warn!(
                provider = name,
                timeout_secs = config.provider_timeout.as_secs_f64(),
                "Provider fetch timed out"
            );
            FetchOutcome::Failed(format!("timed out after {:?}", config.provider_timeout))
        }
    }
}

fn build_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!("newswire/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn article(url: &str, title: &str, ts: &str) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            url: url.to_string(),
            image: None,
            source: "stub".to_string(),
            published_at: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
        }
    }

    struct StaticFetcher {
        name: &'static str,
        articles: Vec<Article>,
        delay: Duration,
    }

    impl StaticFetcher {
        fn new(name: &'static str, articles: Vec<Article>) -> Self {
            Self {
                name,
                articles,
                delay: Duration::ZERO,
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_articles(&self, _client: &Client, _config: &NewsConfig) -> Result<Vec<Article>> {
            tokio::time::sleep(self.delay).await;
            Ok(self.articles.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_articles(&self, _client: &Client, _config: &NewsConfig) -> Result<Vec<Article>> {
            Err(Error::provider("failing", "HTTP 500 Internal Server Error"))
        }
    }

    struct PanickingFetcher;

    #[async_trait]
    impl Fetcher for PanickingFetcher {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn fetch_articles(&self, _client: &Client, _config: &NewsConfig) -> Result<Vec<Article>> {
            panic!("unexpected payload shape");
        }
    }

    #[derive(Default)]
    struct DisabledFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for DisabledFetcher {
        fn name(&self) -> &'static str {
            "disabled"
        }

        fn is_enabled(&self, _config: &NewsConfig) -> bool {
            false
        }

        async fn fetch_articles(&self, _client: &Client, _config: &NewsConfig) -> Result<Vec<Article>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![article("never", "never", "2024-01-01T00:00:00Z")])
        }
    }

    fn aggregator(fetchers: Vec<SharedFetcher>) -> Aggregator {
        let config = NewsConfig {
            provider_timeout: Duration::from_millis(200),
            ..NewsConfig::default()
        };
        Aggregator::with_fetchers(Arc::new(config), fetchers, Client::new())
    }

    #[tokio::test]
    async fn test_declared_order_beats_completion_order() {
        let slow_a = StaticFetcher::new("a", vec![article("x", "A1", "2024-01-02T00:00:00Z")])
            .delayed(Duration::from_millis(50));
        let fast_d = StaticFetcher::new("d", vec![article("x", "A1-dup", "2024-01-01T00:00:00Z")]);

        let articles = aggregator(vec![
            Arc::new(slow_a),
            Arc::new(StaticFetcher::new("b", vec![])),
            Arc::new(StaticFetcher::new("c", vec![])),
            Arc::new(fast_d),
        ])
        .aggregate()
        .await
        .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "A1");
        assert_eq!(articles[0].published_at.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let agg = aggregator(vec![
            Arc::new(StaticFetcher::new("a", vec![article("a1", "A1", "2024-02-01T00:00:00Z")])),
            Arc::new(FailingFetcher),
            Arc::new(PanickingFetcher),
            Arc::new(StaticFetcher::new("d", vec![article("d1", "D1", "2024-03-01T00:00:00Z")])),
        ]);

        let reports = agg.fetch_all().await.unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "failing", "panicking", "d"]);
        assert!(matches!(reports[1].outcome, FetchOutcome::Failed(_)));
        assert_eq!(reports[2].outcome, FetchOutcome::Failed("fetcher panicked".to_string()));

        let articles = agg.aggregate().await.unwrap();
        let urls: Vec<_> = articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["d1", "a1"]);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let slow = StaticFetcher::new("slow", vec![article("s", "S", "2024-01-01T00:00:00Z")])
            .delayed(Duration::from_secs(5));
        let fast = StaticFetcher::new("fast", vec![article("f", "F", "2024-01-01T00:00:00Z")]);

        let agg = aggregator(vec![Arc::new(slow), Arc::new(fast)]);
        let reports = agg.fetch_all().await.unwrap();

        match &reports[0].outcome {
            FetchOutcome::Failed(reason) => assert!(reason.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(reports[1].outcome.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_provider_is_never_called() {
        let disabled = Arc::new(DisabledFetcher::default());
        let shared: SharedFetcher = disabled.clone();
        let agg = aggregator(vec![shared]);

        let reports = agg.fetch_all().await.unwrap();
        assert_eq!(reports[0].outcome, FetchOutcome::Disabled);
        assert_eq!(disabled.calls.load(Ordering::SeqCst), 0);
        assert!(agg.aggregate().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_failing_yields_empty() {
        let agg = aggregator(vec![
            Arc::new(DisabledFetcher::default()),
            Arc::new(FailingFetcher),
        ]);
        assert!(agg.aggregate().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_fetcher_appends_in_order() {
        let mut agg = aggregator(vec![]);
        agg.add_fetcher(Arc::new(StaticFetcher::new("first", vec![])));
        agg.add_fetcher(Arc::new(FailingFetcher));
        let names: Vec<_> = agg.fetchers().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["first", "failing"]);
    }
}
