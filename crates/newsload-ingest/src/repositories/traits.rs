use crate::models::{NewArticleRow, StoredArticle};
use diesel::QueryResult;

/// Storage operations the loader needs from a warehouse connection.
pub trait ArticleRepository {
    /// Creates `news_articles` if it is absent. An existing table is left as is.
    fn ensure_table(&mut self) -> QueryResult<()>;

    /// Inserts `rows`, skipping any whose id is already stored.
    /// Returns the number of rows the engine reports as written.
    fn insert_ignoring_conflicts(&mut self, rows: &[NewArticleRow]) -> QueryResult<usize>;

    fn find_by_id(&mut self, id: &str) -> QueryResult<Option<StoredArticle>>;

    fn count(&mut self) -> QueryResult<i64>;
}
