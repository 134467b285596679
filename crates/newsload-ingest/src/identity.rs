//! Stable row identifiers for articles.
//!
//! An article's identity is its URL. Two spellings of the same link
//! (`HTTPS://Example.com:443/a/#top` and `https://example.com/a`) must land on
//! the same row, so the URL is normalized before it is hashed. Normalization
//! never decodes or drops query data: links that differ in a parameter keep
//! different ids.

use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use thiserror::Error;
use url::Url;

/// Width of an article id in hex characters.
pub const ARTICLE_ID_LEN: usize = 64;

#[derive(Error, Debug, PartialEq)]
pub enum UrlError {
    #[error("URL cannot be empty")]
    EmptyUrl,
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Rewrites an http(s) article link into the form that gets hashed.
///
/// The `url` parser already lowercases the scheme and host and drops default
/// ports. On top of that the fragment and one trailing path slash are removed,
/// and query pairs are stably sorted by their still-encoded key.
pub fn normalize_url(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::EmptyUrl);
    }

    let mut url = Url::parse(trimmed).map_err(|_| UrlError::MalformedUrl(trimmed.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    url.set_fragment(None);

    if let Some(path) = url
        .path()
        .strip_suffix('/')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
    {
        url.set_path(&path);
    }

    let query = url.query().and_then(sorted_query);
    url.set_query(query.as_deref());

    Ok(url.into())
}

fn sorted_query(query: &str) -> Option<String> {
    let mut pairs: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
    // stable: repeated keys keep their relative order
    pairs.sort_by(|a, b| compare_keys(a, b));
    (!pairs.is_empty()).then(|| pairs.join("&"))
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    fn key(pair: &str) -> &str {
        pair.split_once('=').map_or(pair, |(key, _)| key)
    }
    key(a).cmp(key(b))
}

/// Derives the primary key of an article row from its URL.
///
/// The id is the lowercase hex SHA-256 of the normalized URL. Links that do
/// not normalize (odd schemes, no host) are hashed as given, minus
/// surrounding whitespace, so every URL still maps to exactly one id.
pub fn article_id(url: &str) -> String {
    let key = normalize_url(url).unwrap_or_else(|_| url.trim().to_string());
    hex::encode(Sha256::digest(key.as_bytes()))
}
