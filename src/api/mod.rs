//! Client for the external bestseller list API.
//!
//! Handlers talk to [`BookSource`], so the live [`NytClient`] can be swapped
//! for a fixed source in tests. Every operation returns a typed [`ApiError`]
//! on failure; callers decide whether to degrade or propagate.

pub mod client;
pub mod dto;
pub mod error;
pub mod retry;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;

pub use client::NytClient;
pub use error::ApiError;
pub use retry::RetryPolicy;

/// A bestseller list offered by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Encoded list name used in API paths, e.g. `hardcover-fiction`
    pub key: String,
    /// Human-readable label, e.g. `Hardcover Fiction`
    pub label: String,
}

impl Category {
    pub fn from_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            label: category_label(key),
        }
    }
}

/// One book on a current bestseller list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub image: Option<String>,
    pub description: String,
}

/// Past list appearances of a single book
#[derive(Debug, Clone, Serialize)]
pub struct BestsellerHistory {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub ranks: Vec<ListAppearance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListAppearance {
    pub list_name: String,
    pub rank: u32,
    pub bestsellers_date: Option<String>,
    pub weeks_on_list: u32,
}

/// Source of bestseller data
#[async_trait]
pub trait BookSource: Send + Sync {
    /// All list categories, de-duplicated, in API order
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Current books on one list, in rank order with unique titles
    async fn books_by_category(&self, key: &str) -> Result<Vec<BookSummary>, ApiError>;

    /// Bestseller history for a specific title and author
    async fn history(&self, title: &str, author: &str)
        -> Result<Vec<BestsellerHistory>, ApiError>;
}

/// Find the book with exactly `title` on the current list for `key`
pub async fn find_in_category(
    source: &dyn BookSource,
    key: &str,
    title: &str,
) -> Result<Option<BookSummary>, ApiError> {
    let books = source.books_by_category(key).await?;
    Ok(books.into_iter().find(|book| book.title == title))
}

/// Turn an encoded list name into a display label
///
/// `combined-print-and-e-book-fiction` becomes
/// `Combined Print And E Book Fiction`.
pub fn category_label(key: &str) -> String {
    key.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Keep the first occurrence of each key, preserving order
pub fn dedup_categories<I>(keys: I) -> Vec<Category>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .map(|key| Category::from_key(&key))
        .collect()
}

/// Keep the first occurrence of each title, preserving order
pub fn dedup_titles(books: Vec<BookSummary>) -> Vec<BookSummary> {
    let mut seen = HashSet::new();
    books
        .into_iter()
        .filter(|book| seen.insert(book.title.clone()))
        .collect()
}
