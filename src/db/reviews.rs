use sqlx::SqlitePool;

use crate::constants::MSG_ALREADY_REVIEWED;
use crate::db::books;
use crate::error::{AppError, Result};
use crate::forms::{is_absolute_url, ReviewInput};
use crate::models::{Review, ReviewWithAuthor, ReviewWithBook};

const REVIEW_COLUMNS: &str = "id, user_id, book_id, summary, url";

fn check_input(input: &ReviewInput) -> Result<()> {
    if input.summary.trim().is_empty() {
        return Err(AppError::InvalidInput("Review summary is required".to_string()));
    }
    if let Some(url) = &input.url {
        if !is_absolute_url(url) {
            return Err(AppError::InvalidInput(format!("Invalid review URL: {}", url)));
        }
    }
    Ok(())
}

/// Create the user's review of a book
///
/// A second review of the same book by the same user is a Conflict.
pub async fn add(
    pool: &SqlitePool,
    user_id: i64,
    book_id: i64,
    input: &ReviewInput,
) -> Result<Review> {
    check_input(input)?;

    let query = format!(
        "INSERT INTO reviews (user_id, book_id, summary, url) VALUES (?, ?, ?, ?) RETURNING {}",
        REVIEW_COLUMNS
    );
    let mut tx = pool.begin().await?;

    let review = sqlx::query_as::<_, Review>(&query)
        .bind(user_id)
        .bind(book_id)
        .bind(&input.summary)
        .bind(&input.url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict(MSG_ALREADY_REVIEWED.to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    books::refresh_stats(&mut *tx, book_id).await?;
    tx.commit().await?;
    tracing::info!("User {} reviewed book {}", user_id, book_id);

    Ok(review)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Review>> {
    let query = format!("SELECT {} FROM reviews WHERE id = ?", REVIEW_COLUMNS);
    Ok(sqlx::query_as::<_, Review>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Like `find`, but a missing row is `ReviewNotFound`
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Review> {
    find(pool, id).await?.ok_or(AppError::ReviewNotFound)
}

/// The user's review of a book, if any
pub async fn find_for(pool: &SqlitePool, user_id: i64, book_id: i64) -> Result<Option<Review>> {
    let query = format!(
        "SELECT {} FROM reviews WHERE user_id = ? AND book_id = ?",
        REVIEW_COLUMNS
    );
    Ok(sqlx::query_as::<_, Review>(&query)
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(pool)
        .await?)
}

pub async fn update(pool: &SqlitePool, id: i64, input: &ReviewInput) -> Result<Review> {
    check_input(input)?;

    let query = format!(
        "UPDATE reviews SET summary = ?, url = ? WHERE id = ? RETURNING {}",
        REVIEW_COLUMNS
    );
    sqlx::query_as::<_, Review>(&query)
        .bind(&input.summary)
        .bind(&input.url)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::ReviewNotFound)
}

/// Delete a review; false when it did not exist
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let book_id: Option<i64> =
        sqlx::query_scalar("DELETE FROM reviews WHERE id = ? RETURNING book_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some(book_id) = book_id else {
        return Ok(false);
    };

    books::refresh_stats(&mut *tx, book_id).await?;
    tx.commit().await?;

    Ok(true)
}

pub async fn for_book(pool: &SqlitePool, book_id: i64) -> Result<Vec<ReviewWithAuthor>> {
    Ok(sqlx::query_as::<_, ReviewWithAuthor>(
        "SELECT r.id, r.user_id, u.username, r.summary, r.url \
         FROM reviews r JOIN users u ON u.id = r.user_id \
         WHERE r.book_id = ? ORDER BY r.id",
    )
    .bind(book_id)
    .fetch_all(pool)
    .await?)
}

pub async fn for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<ReviewWithBook>> {
    Ok(sqlx::query_as::<_, ReviewWithBook>(
        "SELECT r.id, r.book_id, b.title, r.summary, r.url \
         FROM reviews r JOIN books b ON b.id = r.book_id \
         WHERE r.user_id = ? ORDER BY r.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn input(summary: &str, url: Option<&str>) -> ReviewInput {
        ReviewInput {
            summary: summary.to_string(),
            url: url.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_second_review_is_rejected() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let dune = test_support::book(&pool, "Dune").await;

        add(&pool, alice.id, dune.id, &input("Loved it", None))
            .await
            .unwrap();
        let second = add(&pool, alice.id, dune.id, &input("Still love it", None)).await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
        let reviews = for_book(&pool, dune.id).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].summary, "Loved it");
        assert_eq!(reviews[0].username, "alice");
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_write() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let dune = test_support::book(&pool, "Dune").await;

        let empty = add(&pool, alice.id, dune.id, &input("  ", None)).await;
        let relative = add(&pool, alice.id, dune.id, &input("Fine", Some("reviews/1"))).await;

        assert!(matches!(empty, Err(AppError::InvalidInput(_))));
        assert!(matches!(relative, Err(AppError::InvalidInput(_))));
        assert!(find_for(&pool, alice.id, dune.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let dune = test_support::book(&pool, "Dune").await;
        let review = add(&pool, alice.id, dune.id, &input("Ok", None))
            .await
            .unwrap();

        let updated = update(
            &pool,
            review.id,
            &input("Better on reread", Some("https://example.com/dune")),
        )
        .await
        .unwrap();
        assert_eq!(updated.summary, "Better on reread");
        assert_eq!(updated.url.as_deref(), Some("https://example.com/dune"));

        let by_user = for_user(&pool, alice.id).await.unwrap();
        assert_eq!(by_user[0].title, "Dune");

        assert!(delete(&pool, review.id).await.unwrap());
        assert!(!delete(&pool, review.id).await.unwrap());
        assert!(matches!(get(&pool, review.id).await, Err(AppError::ReviewNotFound)));
    }

    #[tokio::test]
    async fn test_review_count_is_cached_on_book() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let bob = test_support::user(&pool, "bob").await;
        let dune = test_support::book(&pool, "Dune").await;

        add(&pool, alice.id, dune.id, &input("Yes", None)).await.unwrap();
        add(&pool, bob.id, dune.id, &input("No", None)).await.unwrap();

        let book = books::get(&pool, dune.id).await.unwrap();
        assert_eq!(book.num_of_reviews, Some(2));
    }

    #[tokio::test]
    async fn test_failed_refresh_rolls_back_review_writes() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let bob = test_support::user(&pool, "bob").await;
        let dune = test_support::book(&pool, "Dune").await;
        let kept = add(&pool, alice.id, dune.id, &input("Yes", None)).await.unwrap();
        test_support::fail_book_updates(&pool).await;

        let added = add(&pool, bob.id, dune.id, &input("No", None)).await;
        assert!(matches!(added, Err(AppError::Database(_))));
        assert!(find_for(&pool, bob.id, dune.id).await.unwrap().is_none());

        let deleted = delete(&pool, kept.id).await;
        assert!(matches!(deleted, Err(AppError::Database(_))));
        assert!(find(&pool, kept.id).await.unwrap().is_some());
    }
}
