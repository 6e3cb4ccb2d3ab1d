use chrono::NaiveDate;
use serde::Serialize;

use crate::api::BookSummary;

/// A book saved locally, keyed by its unique title
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    /// API list key the book was first saved from
    pub category: Option<String>,
    /// Cover image URL
    pub image: Option<String>,
    pub publication_dt: Option<NaiveDate>,
    /// Cached aggregates, refreshed whenever ratings or reviews change
    pub avg_rating: Option<f64>,
    pub num_of_ratings: Option<i64>,
    pub num_of_reviews: Option<i64>,
}

/// Fields needed to insert a book
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl NewBook {
    /// Build an insertable book from a bestseller list entry
    pub fn from_summary(summary: &BookSummary, category: &str) -> Self {
        Self {
            title: summary.title.clone(),
            author: summary.author.clone(),
            description: summary.description.clone(),
            category: Some(category.to_string()),
            image: summary.image.clone(),
        }
    }
}
