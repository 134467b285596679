use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::errors::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_QUERY: &str = "AI";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// NewsAPI refuses larger pages.
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_REDSHIFT_PORT: u16 = 5439;

/// Which NewsAPI search route to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NewsEndpoint {
    /// `/everything`, filtered to English and sorted by publish date.
    #[default]
    Everything,
    /// `/top-headlines` restricted to the US.
    TopHeadlines,
}

impl NewsEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            NewsEndpoint::Everything => "everything",
            NewsEndpoint::TopHeadlines => "top-headlines",
        }
    }
}

impl fmt::Display for NewsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for NewsEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "everything" => Ok(NewsEndpoint::Everything),
            "top-headlines" | "top_headlines" => Ok(NewsEndpoint::TopHeadlines),
            other => Err(format!(
                "unknown endpoint {other:?}, expected `everything` or `top-headlines`"
            )),
        }
    }
}

/// Everything the fetcher needs to issue its single request.
#[derive(Clone)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub query: String,
    pub page_size: u32,
    pub endpoint: NewsEndpoint,
    pub base_url: Url,
}

impl NewsApiConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(NewsApiConfig {
            api_key,
            query: DEFAULT_QUERY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            endpoint: NewsEndpoint::default(),
            base_url: Url::parse(DEFAULT_API_BASE_URL)
                .map_err(|_| ConfigError::InvalidBaseUrl(DEFAULT_API_BASE_URL.to_string()))?,
        })
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, ConfigError> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize {
                got: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        self.page_size = page_size;
        Ok(self)
    }

    pub fn with_endpoint(mut self, endpoint: NewsEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let parsed =
            Url::parse(base_url).map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        self.base_url = parsed;
        Ok(self)
    }

    /// Full URL of the configured endpoint.
    pub fn endpoint_url(&self) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected when the base URL was set
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.endpoint.path());
        }
        url
    }
}

impl fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &"<redacted>")
            .field("query", &self.query)
            .field("page_size", &self.page_size)
            .field("endpoint", &self.endpoint)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Connection settings for a Redshift or PostgreSQL warehouse.
#[derive(Clone, PartialEq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl PostgresConfig {
    pub fn new(
        host: Option<String>,
        port: u16,
        user: Option<String>,
        password: Option<String>,
        dbname: Option<String>,
    ) -> Result<Self, ConfigError> {
        fn required(
            value: Option<String>,
            name: &'static str,
        ) -> Result<String, ConfigError> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingDatabaseSetting(name))
        }

        Ok(PostgresConfig {
            host: required(host, "host")?,
            port,
            user: required(user, "user")?,
            password: password.unwrap_or_default(),
            dbname: required(dbname, "dbname")?,
        })
    }

    /// libpq connection URL with credentials percent-encoded.
    pub fn connection_url(&self) -> String {
        let base = format!("postgres://{}", self.host);
        let Ok(mut url) = Url::parse(&base) else {
            return self.keyword_value_string();
        };
        let encoded = url.set_port(Some(self.port)).is_ok()
            && url.set_username(&self.user).is_ok()
            && (self.password.is_empty() || url.set_password(Some(self.password.as_str())).is_ok());
        if !encoded {
            return self.keyword_value_string();
        }
        url.set_path(&format!("/{}", self.dbname));
        url.into()
    }

    fn keyword_value_string(&self) -> String {
        fn quote(value: &str) -> String {
            format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
        }

        format!(
            "host={} port={} user={} password={} dbname={}",
            quote(&self.host),
            self.port,
            quote(&self.user),
            quote(&self.password),
            quote(&self.dbname)
        )
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}

/// Where the loader writes.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseConfig {
    Postgres(PostgresConfig),
    /// Local SQLite file, created on first use.
    Sqlite { path: PathBuf },
}

impl DatabaseConfig {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        DatabaseConfig::Sqlite { path: path.into() }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            DatabaseConfig::Postgres(_) => "postgres",
            DatabaseConfig::Sqlite { .. } => "sqlite",
        }
    }
}
