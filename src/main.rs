use clap::Parser;
use newsload_ingest::config::{DEFAULT_API_BASE_URL, DEFAULT_QUERY, DEFAULT_REDSHIFT_PORT};
use newsload_ingest::{
    ConfigError, DatabaseConfig, Loader, NewsApiClient, NewsApiConfig, NewsEndpoint,
    PipelineOutcome, PostgresConfig,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "newsload")]
#[command(about = "Load one page of NewsAPI search results into the news_articles table")]
struct Cli {
    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    api_key: String,

    /// Free-text search query
    #[arg(long, env = "NEWSLOAD_QUERY", default_value = DEFAULT_QUERY)]
    query: String,

    /// Number of articles to request (1-100)
    #[arg(long, env = "NEWSLOAD_PAGE_SIZE", default_value_t = 100)]
    page_size: u32,

    /// NewsAPI route: `everything` or `top-headlines`
    #[arg(long, env = "NEWSLOAD_ENDPOINT", default_value = "everything")]
    endpoint: NewsEndpoint,

    /// Base URL of the NewsAPI service
    #[arg(long, env = "NEWSAPI_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    #[arg(long, env = "REDSHIFT_HOST")]
    db_host: Option<String>,

    #[arg(long, env = "REDSHIFT_PORT", default_value_t = DEFAULT_REDSHIFT_PORT)]
    db_port: u16,

    #[arg(long, env = "REDSHIFT_USER")]
    db_user: Option<String>,

    #[arg(long, env = "REDSHIFT_PASSWORD", hide_env_values = true)]
    db_password: Option<String>,

    #[arg(long, env = "REDSHIFT_DBNAME")]
    db_name: Option<String>,

    /// Write to this SQLite file instead of the warehouse
    #[arg(long, env = "NEWSLOAD_SQLITE_PATH")]
    sqlite_path: Option<PathBuf>,
}

impl Cli {
    fn news_api_config(&self) -> Result<NewsApiConfig, ConfigError> {
        Ok(NewsApiConfig::new(self.api_key.clone())?
            .with_query(self.query.clone())
            .with_page_size(self.page_size)?
            .with_endpoint(self.endpoint)
            .with_base_url(&self.api_base_url)?)
    }

    fn database_config(&self) -> Result<DatabaseConfig, ConfigError> {
        if let Some(path) = &self.sqlite_path {
            return Ok(DatabaseConfig::sqlite(path));
        }

        let pg = PostgresConfig::new(
            self.db_host.clone(),
            self.db_port,
            self.db_user.clone(),
            self.db_password.clone(),
            self.db_name.clone(),
        )?;
        Ok(DatabaseConfig::Postgres(pg))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("newsload=info,newsload_ingest=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "newsload run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let news_config = cli.news_api_config()?;
    let database_config = cli.database_config()?;
    info!(news = ?news_config, database = ?database_config, "Starting newsload run");

    let client = NewsApiClient::new(news_config)?;
    let loader = Loader::new(database_config);

    match newsload_ingest::run(&client, &loader).await? {
        PipelineOutcome::Loaded(report) => info!(
            queued = report.queued,
            inserted = report.inserted,
            "Run complete"
        ),
        PipelineOutcome::NothingToLoad => info!("Run complete, nothing to load"),
        PipelineOutcome::FetchFailed(err) => {
            warn!(error = %err, "Run complete without data, NewsAPI could not be read")
        }
    }

    Ok(())
}
