use serde::Serialize;

/// A book saved on a user's list
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BookListEntry {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub name: Option<String>,
    /// Optional personal rating attached to the entry
    pub rating: Option<i64>,
}

/// Booklist entry joined with its owner and book, for listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BookListRow {
    pub user_id: i64,
    pub username: String,
    pub book_id: i64,
    pub title: String,
    pub author: String,
}

/// Result of saving a book to a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}
