use reqwest::StatusCode;
use thiserror::Error;

use crate::loader::LoadStage;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to NewsAPI failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("NewsAPI answered {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    HttpStatus {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("NewsAPI error {code}: {message}")]
    Api { code: String, message: String },

    #[error("Could not decode NewsAPI response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not connect to the warehouse: {0}")]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("Article {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("Article {index} has publishedAt {value:?} which is not YYYY-MM-DDTHH:MM:SSZ")]
    InvalidTimestamp {
        index: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Transaction failed: {0}")]
    Transaction(#[from] diesel::result::Error),

    #[error("Database error while entering the {stage} stage: {source}")]
    Database {
        stage: LoadStage,
        #[source]
        source: diesel::result::Error,
    },

    #[error("Load worker did not finish: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl LoadError {
    pub fn database(stage: LoadStage) -> impl FnOnce(diesel::result::Error) -> Self {
        move |source| LoadError::Database { stage, source }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("A NewsAPI key is required")]
    MissingApiKey,

    #[error("Page size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: u32, max: u32 },

    #[error("Invalid NewsAPI base URL {0:?}")]
    InvalidBaseUrl(String),

    #[error("Database setting `{0}` is required")]
    MissingDatabaseSetting(&'static str),
}
