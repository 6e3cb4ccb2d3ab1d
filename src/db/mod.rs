//! Repository operations over the relational schema in `migrations/`.
//!
//! Uniqueness rules (one rating, review and booklist entry per user and
//! book; one follow edge per ordered pair) live in the schema, so the
//! functions here lean on `ON CONFLICT` rather than check-then-insert.

pub mod booklists;
pub mod books;
pub mod follows;
pub mod pool;
pub mod ratings;
pub mod reviews;
pub mod users;

pub use pool::{create_memory_pool, create_pool, run_migrations};

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;

    use crate::models::{Book, NewBook, User};

    /// Fresh migrated in-memory database
    pub async fn pool() -> SqlitePool {
        let pool = super::create_memory_pool().await.unwrap();
        super::run_migrations(&pool).await.unwrap();
        pool
    }

    /// Insert a user without paying for a real password hash
    pub async fn user(pool: &SqlitePool, username: &str) -> User {
        super::users::insert(
            pool,
            username,
            &format!("{}@example.com", username),
            "$argon2id$not-a-real-hash",
        )
        .await
        .unwrap()
    }

    /// Make every UPDATE of `books` abort, so aggregate refreshes fail
    pub async fn fail_book_updates(pool: &SqlitePool) {
        sqlx::query(
            "CREATE TRIGGER fail_book_updates BEFORE UPDATE ON books \
             BEGIN SELECT RAISE(ABORT, 'books are read-only'); END",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    pub async fn book(pool: &SqlitePool, title: &str) -> Book {
        super::books::find_or_create(
            pool,
            &NewBook {
                title: title.to_string(),
                author: "Test Author".to_string(),
                description: "Test description".to_string(),
                category: Some("hardcover-fiction".to_string()),
                image: None,
            },
        )
        .await
        .unwrap()
    }
}
