use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{AppError, Result};
use crate::models::{Book, NewBook};

const BOOK_COLUMNS: &str = "id, title, author, description, category, image, publication_dt, \
                            avg_rating, num_of_ratings, num_of_reviews";

/// Return the book with this title, inserting it first if it is new
///
/// Safe against a concurrent insert of the same title: the losing insert
/// does nothing and the existing row is returned.
pub async fn find_or_create(pool: &SqlitePool, book: &NewBook) -> Result<Book> {
    let inserted = sqlx::query(
        "INSERT INTO books (title, author, description, category, image) \
         VALUES (?, ?, ?, ?, ?) ON CONFLICT(title) DO NOTHING",
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.description)
    .bind(&book.category)
    .bind(&book.image)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        tracing::info!("Saved new book {:?}", book.title);
    } else {
        tracing::debug!("Book {:?} already in database", book.title);
    }

    find_by_title(pool, &book.title)
        .await?
        .ok_or(AppError::BookNotFound)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Book>> {
    let query = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
    Ok(sqlx::query_as::<_, Book>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Like `find_by_id`, but a missing row is `BookNotFound`
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Book> {
    find_by_id(pool, id).await?.ok_or(AppError::BookNotFound)
}

pub async fn find_by_title(pool: &SqlitePool, title: &str) -> Result<Option<Book>> {
    let query = format!("SELECT {} FROM books WHERE title = ?", BOOK_COLUMNS);
    Ok(sqlx::query_as::<_, Book>(&query)
        .bind(title)
        .fetch_optional(pool)
        .await?)
}

pub async fn list_by_title(pool: &SqlitePool) -> Result<Vec<Book>> {
    let query = format!("SELECT {} FROM books ORDER BY title", BOOK_COLUMNS);
    Ok(sqlx::query_as::<_, Book>(&query).fetch_all(pool).await?)
}

/// Recompute the cached rating and review aggregates of one book
pub async fn refresh_stats<'e, E>(executor: E, book_id: i64) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "UPDATE books SET \
             avg_rating = (SELECT AVG(score) FROM ratings WHERE book_id = ?1), \
             num_of_ratings = (SELECT COUNT(*) FROM ratings WHERE book_id = ?1), \
             num_of_reviews = (SELECT COUNT(*) FROM reviews WHERE book_id = ?1) \
         WHERE id = ?1",
    )
    .bind(book_id)
    .execute(executor)
    .await?;

    Ok(())
}
