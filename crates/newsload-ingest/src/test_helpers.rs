use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::identity::article_id;
use crate::models::NewArticleRow;
use crate::repositories::ArticleRepository;

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    connection
        .ensure_table()
        .expect("Failed to create news_articles");

    connection
}

pub fn sample_row(url: &str, title: &str) -> NewArticleRow {
    NewArticleRow {
        id: article_id(url),
        title: title.to_string(),
        author: None,
        source_name: "Example News".to_string(),
        published_at: NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid date"),
        url: url.to_string(),
        content: None,
        description: None,
    }
}
