use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{Book, BookListEntry, BookListRow, SaveOutcome, User};

/// Save a book to a user's list; saving it again changes nothing
pub async fn add(pool: &SqlitePool, user_id: i64, book_id: i64) -> Result<SaveOutcome> {
    let inserted = sqlx::query(
        "INSERT INTO booklists (user_id, book_id) VALUES (?, ?) \
         ON CONFLICT(user_id, book_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(book_id)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        tracing::info!("User {} saved book {}", user_id, book_id);
        Ok(SaveOutcome::Saved)
    } else {
        Ok(SaveOutcome::AlreadySaved)
    }
}

/// Remove a book from a user's list; false when it was not there
pub async fn remove(pool: &SqlitePool, user_id: i64, book_id: i64) -> Result<bool> {
    let removed = sqlx::query("DELETE FROM booklists WHERE user_id = ? AND book_id = ?")
        .bind(user_id)
        .bind(book_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(removed > 0)
}

pub async fn find(pool: &SqlitePool, user_id: i64, book_id: i64) -> Result<Option<BookListEntry>> {
    Ok(sqlx::query_as::<_, BookListEntry>(
        "SELECT id, user_id, book_id, name, rating FROM booklists \
         WHERE user_id = ? AND book_id = ?",
    )
    .bind(user_id)
    .bind(book_id)
    .fetch_optional(pool)
    .await?)
}

/// Books on a user's list, in the order they were saved
pub async fn books_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Book>> {
    Ok(sqlx::query_as::<_, Book>(
        "SELECT b.id, b.title, b.author, b.description, b.category, b.image, \
                b.publication_dt, b.avg_rating, b.num_of_ratings, b.num_of_reviews \
         FROM books b JOIN booklists l ON l.book_id = b.id \
         WHERE l.user_id = ? ORDER BY l.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Users who saved a book
pub async fn users_for_book(pool: &SqlitePool, book_id: i64) -> Result<Vec<User>> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.email, u.password, u.created_at \
         FROM users u JOIN booklists l ON l.user_id = u.id \
         WHERE l.book_id = ? ORDER BY u.username",
    )
    .bind(book_id)
    .fetch_all(pool)
    .await?)
}

/// Every saved entry across all users
pub async fn all(pool: &SqlitePool) -> Result<Vec<BookListRow>> {
    Ok(sqlx::query_as::<_, BookListRow>(
        "SELECT u.id AS user_id, u.username, b.id AS book_id, b.title, b.author \
         FROM booklists l \
         JOIN users u ON u.id = l.user_id \
         JOIN books b ON b.id = l.book_id \
         ORDER BY u.username, l.id",
    )
    .fetch_all(pool)
    .await?)
}
