pub mod config;
pub mod errors;
pub mod fetcher;
pub mod identity;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod repositories;
pub mod schema;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use config::{DatabaseConfig, NewsApiConfig, NewsEndpoint, PostgresConfig};
pub use errors::{ConfigError, FetchError, LoadError};
pub use fetcher::{ArticleFeed, NewsApiClient};
pub use loader::{LoadReport, LoadStage, Loader};
pub use models::ArticleRecord;
pub use pipeline::{PipelineOutcome, run};
