use super::traits::ArticleRepository;
use crate::models::{NewArticleRow, StoredArticle};
use crate::schema::news_articles;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

/// DDL accepted by both PostgreSQL/Redshift and SQLite.
pub const CREATE_NEWS_ARTICLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS news_articles (
    id VARCHAR(255) PRIMARY KEY,
    title TEXT NOT NULL,
    author VARCHAR(255),
    source_name VARCHAR(255) NOT NULL,
    published_at TIMESTAMP NOT NULL,
    url TEXT NOT NULL,
    content TEXT,
    description TEXT,
    inserted_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

impl ArticleRepository for PgConnection {
    fn ensure_table(&mut self) -> QueryResult<()> {
        self.batch_execute(CREATE_NEWS_ARTICLES_TABLE)
    }

    fn insert_ignoring_conflicts(&mut self, rows: &[NewArticleRow]) -> QueryResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        // One multi-row INSERT for the whole batch.
        diesel::insert_into(news_articles::table)
            .values(rows)
            .on_conflict_do_nothing()
            .execute(self)
    }

    fn find_by_id(&mut self, id: &str) -> QueryResult<Option<StoredArticle>> {
        news_articles::table
            .find(id)
            .select(StoredArticle::as_select())
            .first(self)
            .optional()
    }

    fn count(&mut self) -> QueryResult<i64> {
        news_articles::table.count().get_result(self)
    }
}

impl ArticleRepository for SqliteConnection {
    fn ensure_table(&mut self) -> QueryResult<()> {
        self.batch_execute(CREATE_NEWS_ARTICLES_TABLE)
    }

    fn insert_ignoring_conflicts(&mut self, rows: &[NewArticleRow]) -> QueryResult<usize> {
        // Row by row; the caller's transaction keeps the batch atomic.
        rows.iter().try_fold(0, |inserted, row| {
            diesel::insert_into(news_articles::table)
                .values(row)
                .on_conflict_do_nothing()
                .execute(self)
                .map(|n| inserted + n)
        })
    }

    fn find_by_id(&mut self, id: &str) -> QueryResult<Option<StoredArticle>> {
        news_articles::table
            .find(id)
            .select(StoredArticle::as_select())
            .first(self)
            .optional()
    }

    fn count(&mut self) -> QueryResult<i64> {
        news_articles::table.count().get_result(self)
    }
}
