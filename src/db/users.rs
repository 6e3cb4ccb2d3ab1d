use sqlx::{SqliteExecutor, SqlitePool};

use crate::constants::MSG_ACCOUNT_TAKEN;
use crate::db::books;
use crate::error::{AppError, Result};
use crate::models::User;

const USER_COLUMNS: &str = "id, username, email, password, created_at";

/// Insert a user row; the password must already be hashed
pub async fn insert(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let query = format!(
        "INSERT INTO users (username, email, password) VALUES (?, ?, ?) RETURNING {}",
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&query)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict(MSG_ACCOUNT_TAKEN.to_string())
            } else {
                AppError::Database(e)
            }
        })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    Ok(sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Like `find_by_id`, but a missing row is `UserNotFound`
pub async fn get(pool: &SqlitePool, id: i64) -> Result<User> {
    find_by_id(pool, id).await?.ok_or(AppError::UserNotFound)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
    Ok(sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await?)
}

pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(count > 0)
}

/// All users ordered by name, optionally filtered by a case-insensitive
/// username substring
pub async fn list(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<User>> {
    let users = match search {
        Some(term) => {
            let query = format!(
                "SELECT {} FROM users WHERE instr(lower(username), lower(?)) > 0 \
                 ORDER BY username",
                USER_COLUMNS
            );
            sqlx::query_as::<_, User>(&query)
                .bind(term)
                .fetch_all(pool)
                .await?
        }
        None => {
            let query = format!("SELECT {} FROM users ORDER BY username", USER_COLUMNS);
            sqlx::query_as::<_, User>(&query).fetch_all(pool).await?
        }
    };

    Ok(users)
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?)
}

/// Change username and email; a collision with another account is a Conflict
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    username: &str,
    email: &str,
) -> Result<User> {
    let query = format!(
        "UPDATE users SET username = ?, email = ? WHERE id = ? RETURNING {}",
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&query)
        .bind(username)
        .bind(email)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict(MSG_ACCOUNT_TAKEN.to_string())
            } else {
                AppError::Database(e)
            }
        })?
        .ok_or(AppError::UserNotFound)
}

/// Delete a user and everything they own
///
/// Booklist entries, reviews, ratings and follow edges in both directions go
/// with the user through `ON DELETE CASCADE`. Cached aggregates of the books
/// the user rated or reviewed are refreshed in the same transaction.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let affected_books: Vec<i64> = sqlx::query_scalar(
        "SELECT book_id FROM ratings WHERE user_id = ? \
         UNION SELECT book_id FROM reviews WHERE user_id = ?",
    )
    .bind(id)
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        > 0;

    for book_id in affected_books {
        books::refresh_stats(&mut *tx, book_id).await?;
    }

    tx.commit().await?;

    if deleted {
        tracing::info!("User {} and all associated data deleted", id);
    }

    Ok(deleted)
}
