use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org";
pub const GUARDIAN_BASE_URL: &str = "https://content.guardianapis.com";
pub const GNEWS_BASE_URL: &str = "https://gnews.io";
pub const GOOGLE_NEWS_FEED_URL: &str = "https://news.google.com/rss/search";

const MAX_PAGE_SIZE: usize = 100;

/// Credentials and endpoint for one keyed provider. A provider with no key is
/// disabled.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl ProviderConfig {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Process-wide news settings, read once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsConfig {
    pub newsapi: ProviderConfig,
    pub guardian: ProviderConfig,
    pub gnews: ProviderConfig,
    pub feed_url: String,
    pub query: String,
    pub language: String,
    pub country: String,
    pub page_size: usize,
    pub lookback_days: i64,
    pub provider_timeout: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            newsapi: ProviderConfig::new(None, NEWSAPI_BASE_URL),
            guardian: ProviderConfig::new(None, GUARDIAN_BASE_URL),
            gnews: ProviderConfig::new(None, GNEWS_BASE_URL),
            feed_url: GOOGLE_NEWS_FEED_URL.to_string(),
            query: "technology".to_string(),
            language: "en".to_string(),
            country: "us".to_string(),
            page_size: 20,
            lookback_days: 7,
            provider_timeout: Duration::from_secs(8),
        }
    }
}

impl NewsConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            newsapi: ProviderConfig::new(
                lookup("NEWSAPI_API_KEY"),
                text("NEWSAPI_BASE_URL", defaults.newsapi.base_url),
            ),
            guardian: ProviderConfig::new(
                lookup("GUARDIAN_API_KEY"),
                text("GUARDIAN_BASE_URL", defaults.guardian.base_url),
            ),
            gnews: ProviderConfig::new(
                lookup("GNEWS_API_KEY"),
                text("GNEWS_BASE_URL", defaults.gnews.base_url),
            ),
            feed_url: text("NEWS_FEED_URL", defaults.feed_url),
            query: text("NEWS_QUERY", defaults.query),
            language: text("NEWS_LANGUAGE", defaults.language),
            country: text("NEWS_COUNTRY", defaults.country),
            page_size: parse_or(&lookup, "NEWS_PAGE_SIZE", defaults.page_size)
                .clamp(1, MAX_PAGE_SIZE),
            lookback_days: parse_or(&lookup, "NEWS_LOOKBACK_DAYS", defaults.lookback_days).max(0),
            provider_timeout: Duration::from_secs(parse_or(
                &lookup,
                "NEWS_PROVIDER_TIMEOUT_SECS",
                defaults.provider_timeout.as_secs(),
            )),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "Invalid value; using default");
            default
        }),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_disable_keyed_providers() {
        let config = NewsConfig::from_map(&HashMap::new());
        assert_eq!(config, NewsConfig::default());
        assert!(!config.newsapi.is_enabled());
        assert!(!config.guardian.is_enabled());
        assert!(!config.gnews.is_enabled());
        assert_eq!(config.feed_url, GOOGLE_NEWS_FEED_URL);
    }

    #[test]
    fn test_credentials_enable_providers_independently() {
        let config = NewsConfig::from_map(&vars(&[
            ("NEWSAPI_API_KEY", "abc"),
            ("GNEWS_API_KEY", "   "),
        ]));
        assert!(config.newsapi.is_enabled());
        assert!(!config.guardian.is_enabled());
        assert!(!config.gnews.is_enabled());
    }

    #[test]
    fn test_numeric_overrides_and_fallbacks() {
        let config = NewsConfig::from_map(&vars(&[
            ("NEWS_PAGE_SIZE", "500"),
            ("NEWS_LOOKBACK_DAYS", "soon"),
            ("NEWS_PROVIDER_TIMEOUT_SECS", "3"),
            ("NEWS_QUERY", "marketing"),
        ]));
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.lookback_days, 7);
        assert_eq!(config.provider_timeout, Duration::from_secs(3));
        assert_eq!(config.query, "marketing");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let provider = ProviderConfig::new(Some("secret".to_string()), NEWSAPI_BASE_URL);
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
