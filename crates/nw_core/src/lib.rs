pub mod config;
pub mod error;
pub mod logging;
pub mod time;
pub mod types;

pub use config::{NewsConfig, ProviderConfig};
pub use error::{Error, Result};
pub use types::Article;

pub mod prelude {
    pub use crate::{Article, Error, NewsConfig, Result};
}
