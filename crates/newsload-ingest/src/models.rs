use crate::errors::LoadError;
use crate::identity::article_id;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Exact layout NewsAPI uses for `publishedAt`.
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// An article as NewsAPI returns it.
///
/// Every field is optional at this layer; the required ones are enforced when
/// the record becomes a [`NewArticleRow`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleRecord {
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::news_articles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite, diesel::pg::Pg))]
pub struct StoredArticle {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub source_name: String,
    pub published_at: NaiveDateTime,
    pub url: String,
    pub content: Option<String>,
    pub description: Option<String>,
    pub inserted_at: NaiveDateTime,
}

/// One row of `news_articles`, minus `inserted_at` which the database fills.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = crate::schema::news_articles)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewArticleRow {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub source_name: String,
    pub published_at: NaiveDateTime,
    pub url: String,
    pub content: Option<String>,
    pub description: Option<String>,
}

impl NewArticleRow {
    /// Builds the row for the record at `index` of a batch.
    pub fn from_record(index: usize, record: &ArticleRecord) -> Result<Self, LoadError> {
        let missing = |field: &'static str| LoadError::MissingField { index, field };

        let url = record.url.clone().ok_or_else(|| missing("url"))?;
        let title = record.title.clone().ok_or_else(|| missing("title"))?;
        let source_name = record
            .source
            .name
            .clone()
            .ok_or_else(|| missing("source.name"))?;
        let raw_published_at = record
            .published_at
            .as_deref()
            .ok_or_else(|| missing("publishedAt"))?;

        let published_at = NaiveDateTime::parse_from_str(raw_published_at, PUBLISHED_AT_FORMAT)
            .map_err(|source| LoadError::InvalidTimestamp {
                index,
                value: raw_published_at.to_string(),
                source,
            })?;

        Ok(NewArticleRow {
            id: article_id(&url),
            title,
            author: record.author.clone(),
            source_name,
            published_at,
            url,
            content: record.content.clone(),
            description: record.description.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn record(value: serde_json::Value) -> ArticleRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserializes_newsapi_article() {
        let article = record(json!({
            "source": { "id": "wired", "name": "Wired" },
            "author": "Jane Doe",
            "title": "Chips",
            "description": "About chips",
            "url": "https://www.wired.com/story/chips/",
            "urlToImage": "https://media.wired.com/chips.jpg",
            "publishedAt": "2024-03-05T14:30:00Z",
            "content": "Long text [+1234 chars]"
        }));

        assert_eq!(article.source.name.as_deref(), Some("Wired"));
        assert_eq!(article.published_at.as_deref(), Some("2024-03-05T14:30:00Z"));
        assert_eq!(
            article.url_to_image.as_deref(),
            Some("https://media.wired.com/chips.jpg")
        );
    }

    #[test]
    fn test_row_from_minimal_record() {
        let article = record(json!({
            "url": "https://a",
            "title": "T1",
            "source": { "name": "S" },
            "publishedAt": "2024-01-01T00:00:00Z"
        }));

        let row = NewArticleRow::from_record(0, &article).unwrap();

        assert_eq!(row.id, article_id("https://a"));
        assert_eq!(row.url, "https://a");
        assert_eq!(row.title, "T1");
        assert_eq!(row.source_name, "S");
        assert_eq!(
            row.published_at,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert!(row.author.is_none());
        assert!(row.content.is_none());
        assert!(row.description.is_none());
    }

    #[test]
    fn test_row_rejects_fractional_seconds() {
        let article = record(json!({
            "url": "https://a",
            "title": "T1",
            "source": { "name": "S" },
            "publishedAt": "2024-01-01T00:00:00.120Z"
        }));

        let err = NewArticleRow::from_record(3, &article).unwrap_err();
        assert!(matches!(err, LoadError::InvalidTimestamp { index: 3, .. }));
    }

    #[test]
    fn test_row_requires_source_name() {
        let article = record(json!({
            "url": "https://a",
            "title": "T1",
            "source": { "id": null, "name": null },
            "publishedAt": "2024-01-01T00:00:00Z"
        }));

        let err = NewArticleRow::from_record(1, &article).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField {
                index: 1,
                field: "source.name"
            }
        ));
    }

    #[test]
    fn test_row_requires_url() {
        let article = record(json!({
            "title": "T1",
            "source": { "name": "S" },
            "publishedAt": "2024-01-01T00:00:00Z"
        }));

        assert!(matches!(
            NewArticleRow::from_record(0, &article),
            Err(LoadError::MissingField { field: "url", .. })
        ));
    }
}
