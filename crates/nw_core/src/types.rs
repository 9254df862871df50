use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article in the canonical shape every provider is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: Option<String>,
    pub source: String,
    #[serde(with = "millis_timestamp")]
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// Deduplication key: the url when present, otherwise the title.
    ///
    /// Returns `None` when the article carries neither, in which case it
    /// cannot be told apart from anything else and is dropped.
    pub fn identity_key(&self) -> Option<&str> {
        let url = self.url.trim();
        if !url.is_empty() {
            return Some(url);
        }
        let title = self.title.trim();
        if !title.is_empty() {
            return Some(title);
        }
        None
    }
}

/// Serializes timestamps as `2024-01-01T00:00:00.000Z`.
pub mod millis_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
