use diesel::pg::PgConnection;
use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

use crate::config::DatabaseConfig;
use crate::errors::LoadError;
use crate::models::{ArticleRecord, NewArticleRow};
use crate::repositories::ArticleRepository;

/// Where a load is in its lifecycle.
///
/// `Idle -> Connected -> TableEnsured -> RowsQueued -> Committed -> Closed`,
/// and any failure after connecting goes `RolledBack -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Idle,
    Connected,
    TableEnsured,
    RowsQueued,
    Committed,
    RolledBack,
    Closed,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadStage::Idle => "idle",
            LoadStage::Connected => "connected",
            LoadStage::TableEnsured => "table_ensured",
            LoadStage::RowsQueued => "rows_queued",
            LoadStage::Committed => "committed",
            LoadStage::RolledBack => "rolled_back",
            LoadStage::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Outcome of a committed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows sent to the database.
    pub queued: usize,
    /// Rows the database reports as written; ids already present are not counted.
    pub inserted: usize,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.queued.saturating_sub(self.inserted)
    }
}

/// Writes one batch of articles per call, each on its own connection.
#[derive(Debug, Clone)]
pub struct Loader {
    config: DatabaseConfig,
}

impl Loader {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Loads `articles` in a single transaction.
    ///
    /// An empty batch returns an empty report without touching the database.
    /// Otherwise either every row is queued and committed or the transaction is
    /// rolled back; the connection is closed before this returns.
    #[instrument(skip_all, fields(backend = self.config.backend_name(), articles = articles.len()))]
    pub fn load(&self, articles: &[ArticleRecord]) -> Result<LoadReport, LoadError> {
        if articles.is_empty() {
            info!("No articles to write");
            return Ok(LoadReport::default());
        }

        debug!(stage = %LoadStage::Idle, "Opening warehouse connection");

        let result = match &self.config {
            DatabaseConfig::Postgres(pg) => {
                let mut conn =
                    PgConnection::establish(&pg.connection_url()).inspect_err(|err| {
                        error!(
                            host = %pg.host,
                            port = pg.port,
                            dbname = %pg.dbname,
                            error = %err,
                            "Failed to connect to warehouse"
                        )
                    })?;
                debug!(stage = %LoadStage::Connected, host = %pg.host, dbname = %pg.dbname);
                write_batch(&mut conn, articles)
            }
            DatabaseConfig::Sqlite { path } => {
                let database_url = path.to_string_lossy();
                let mut conn = SqliteConnection::establish(&database_url).inspect_err(|err| {
                    error!(database_url = %database_url, error = %err, "Failed to connect to warehouse")
                })?;
                debug!(stage = %LoadStage::Connected, database_url = %database_url);
                write_batch(&mut conn, articles)
            }
        };

        match &result {
            Ok(report) => info!(
                stage = %LoadStage::Committed,
                queued = report.queued,
                inserted = report.inserted,
                skipped = report.skipped(),
                "Successfully inserted articles"
            ),
            Err(err) => error!(
                stage = %LoadStage::RolledBack,
                error = %err,
                "Load failed, batch rolled back"
            ),
        }
        debug!(stage = %LoadStage::Closed);

        result
    }
}

fn write_batch<C>(conn: &mut C, articles: &[ArticleRecord]) -> Result<LoadReport, LoadError>
where
    C: Connection + ArticleRepository,
{
    conn.transaction(|conn| {
        conn.ensure_table()
            .map_err(LoadError::database(LoadStage::TableEnsured))?;
        debug!(stage = %LoadStage::TableEnsured);

        let rows = articles
            .iter()
            .enumerate()
            .map(|(index, article)| NewArticleRow::from_record(index, article))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| warn!(error = %err, "Rejecting batch"))?;

        let inserted = conn
            .insert_ignoring_conflicts(&rows)
            .map_err(LoadError::database(LoadStage::RowsQueued))?;
        debug!(stage = %LoadStage::RowsQueued, queued = rows.len(), inserted);

        Ok(LoadReport {
            queued: rows.len(),
            inserted,
        })
    })
}
