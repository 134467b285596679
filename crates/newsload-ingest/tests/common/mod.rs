#![allow(dead_code)]

use diesel::{Connection, sqlite::SqliteConnection};
use newsload_ingest::identity::article_id;
use newsload_ingest::models::StoredArticle;
use newsload_ingest::repositories::ArticleRepository;
use newsload_ingest::{ArticleRecord, DatabaseConfig, Loader};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn article(url: &str, title: &str, published_at: &str) -> ArticleRecord {
    serde_json::from_value(json!({
        "source": { "id": null, "name": "Example News" },
        "author": "Reporter",
        "title": title,
        "description": format!("About {title}"),
        "url": url,
        "urlToImage": null,
        "publishedAt": published_at,
        "content": "Body text [+100 chars]"
    }))
    .expect("Failed to build article")
}

pub fn articles(count: usize) -> Vec<ArticleRecord> {
    (0..count)
        .map(|i| {
            article(
                &format!("https://news.example.com/story/{i}"),
                &format!("Story {i}"),
                "2024-05-01T08:30:00Z",
            )
        })
        .collect()
}

/// A SQLite warehouse in a temporary directory.
pub struct TempWarehouse {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TempWarehouse {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("warehouse.db");
        Self { _dir: dir, path }
    }

    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig::sqlite(&self.path)
    }

    pub fn loader(&self) -> Loader {
        Loader::new(self.config())
    }

    pub fn connect(&self) -> SqliteConnection {
        let mut connection = SqliteConnection::establish(&self.path.to_string_lossy())
            .expect("Failed to open warehouse");
        connection
            .ensure_table()
            .expect("Failed to create news_articles");
        connection
    }

    pub fn count(&self) -> i64 {
        self.connect().count().expect("Failed to count articles")
    }

    pub fn find_by_url(&self, url: &str) -> Option<StoredArticle> {
        self.connect()
            .find_by_id(&article_id(url))
            .expect("Failed to query article")
    }
}

pub mod server_utils {
    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        routing::get,
    };
    use newsload_ingest::{NewsApiClient, NewsApiConfig, NewsEndpoint};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// A local stand-in for the NewsAPI service.
    pub struct MockNewsApi {
        pub base_url: String,
        pub requests: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
    }

    impl MockNewsApi {
        /// Answers both search routes with `status` and `body`.
        pub async fn start(status: StatusCode, body: Value) -> Self {
            let requests = Arc::new(Mutex::new(Vec::new()));

            let route = |name: &'static str| {
                let recorded = requests.clone();
                let body = body.clone();
                get(move |Query(params): Query<HashMap<String, String>>| {
                    let recorded = recorded.clone();
                    let body = body.clone();
                    async move {
                        recorded
                            .lock()
                            .unwrap()
                            .push((name.to_string(), params));
                        (status, Json(body))
                    }
                })
            };

            let app = Router::new()
                .route("/v2/everything", route("everything"))
                .route("/v2/top-headlines", route("top-headlines"));

            let base_url = serve(app).await;
            Self { base_url, requests }
        }

        /// Answers every request with a 200 and a plain-text body.
        pub async fn start_text(body: &'static str) -> Self {
            let app = Router::new().route("/v2/everything", get(move || async move { body }));
            let base_url = serve(app).await;
            Self {
                base_url,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn requests(&self) -> Vec<(String, HashMap<String, String>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock NewsAPI");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock NewsAPI failed");
        });
        format!("http://{addr}/v2")
    }

    /// A client for `base_url` that never goes through a proxy.
    pub fn news_client(base_url: &str, endpoint: NewsEndpoint) -> anyhow::Result<NewsApiClient> {
        let config = NewsApiConfig::new("test-key")?
            .with_query("AI")
            .with_page_size(2)?
            .with_endpoint(endpoint)
            .with_base_url(base_url)?;
        let http = reqwest::Client::builder().no_proxy().build()?;
        Ok(NewsApiClient::with_client(http, config))
    }

    /// A base URL nothing is listening on.
    pub async fn closed_base_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read local address");
        drop(listener);
        format!("http://{addr}/v2")
    }
}
