use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::config::{NewsApiConfig, NewsEndpoint};
use crate::errors::FetchError;
use crate::models::ArticleRecord;

const USER_AGENT: &str = concat!("newsload/", env!("CARGO_PKG_VERSION"));

/// A source of articles for one pipeline run.
#[async_trait]
pub trait ArticleFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ArticleRecord>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    status: String,
    #[serde(rename = "totalResults")]
    total_results: Option<u64>,
    articles: Option<Vec<ArticleRecord>>,
    code: Option<String>,
    message: Option<String>,
}

/// Issues the single NewsAPI search request of a run.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: NewsApiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &NewsApiConfig {
        &self.config
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apiKey", self.config.api_key.clone()),
            ("q", self.config.query.clone()),
            ("pageSize", self.config.page_size.to_string()),
        ];

        match self.config.endpoint {
            NewsEndpoint::Everything => {
                params.push(("sortBy", "publishedAt".to_string()));
                params.push(("language", "en".to_string()));
            }
            NewsEndpoint::TopHeadlines => {
                params.push(("country", "us".to_string()));
            }
        }

        params
    }
}

#[async_trait]
impl ArticleFeed for NewsApiClient {
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint, query = %self.config.query, page_size = self.config.page_size))]
    async fn fetch(&self) -> Result<Vec<ArticleRecord>, FetchError> {
        let response = self
            .client
            .get(self.config.endpoint_url())
            .query(&self.query_params())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, body_len = body.len(), "NewsAPI responded");

        if !status.is_success() {
            let message = serde_json::from_str::<NewsApiResponse>(&body)
                .ok()
                .and_then(|payload| payload.message);
            return Err(FetchError::HttpStatus { status, message });
        }

        let payload: NewsApiResponse = serde_json::from_str(&body)?;

        if payload.status != "ok" {
            return Err(FetchError::Api {
                code: payload.code.unwrap_or_else(|| "unknown".to_string()),
                message: payload
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        let articles = payload.articles.unwrap_or_default();
        info!(
            fetched = articles.len(),
            total_results = payload.total_results,
            "Fetched articles from NewsAPI"
        );

        Ok(articles)
    }
}
