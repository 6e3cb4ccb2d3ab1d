use serde::Serialize;

/// A user's review of a book, at most one per (user, book)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub summary: String,
    pub url: Option<String>,
}

/// Review with its author's name, for book pages
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewWithAuthor {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub summary: String,
    pub url: Option<String>,
}

/// Review with its book's title, for profile pages
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewWithBook {
    pub id: i64,
    pub book_id: i64,
    pub title: String,
    pub summary: String,
    pub url: Option<String>,
}
