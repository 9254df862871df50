pub mod aggregator;
pub mod fetchers;
pub mod pipeline;

pub use aggregator::{run_fetcher, Aggregator, ProviderReport};
pub use fetchers::{default_fetchers, FetchOutcome, Fetcher, SharedFetcher};

pub mod prelude {
    pub use super::fetchers::Fetcher;
    pub use super::Aggregator;
    pub use nw_core::{Article, Error, NewsConfig, Result};
}
