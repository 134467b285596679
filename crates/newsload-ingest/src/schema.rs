// Mirrors the DDL in `repositories::articles::CREATE_NEWS_ARTICLES_TABLE`.

diesel::table! {
    news_articles (id) {
        #[max_length = 255]
        id -> Varchar,
        title -> Text,
        #[max_length = 255]
        author -> Nullable<Varchar>,
        #[max_length = 255]
        source_name -> Varchar,
        published_at -> Timestamp,
        url -> Text,
        content -> Nullable<Text>,
        description -> Nullable<Text>,
        inserted_at -> Timestamp,
    }
}
