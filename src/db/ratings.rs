use sqlx::SqlitePool;

use crate::constants::{MAX_SCORE, MIN_SCORE};
use crate::db::books;
use crate::error::{AppError, Result};
use crate::models::{Rating, RatingSummary};

/// Set the user's score for a book, replacing any earlier score
pub async fn upsert(pool: &SqlitePool, user_id: i64, book_id: i64, score: i64) -> Result<Rating> {
    if !Rating::validate_score(score) {
        return Err(AppError::InvalidInput(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        )));
    }

    let mut tx = pool.begin().await?;

    let rating = sqlx::query_as::<_, Rating>(
        "INSERT INTO ratings (user_id, book_id, score) VALUES (?, ?, ?) \
         ON CONFLICT(user_id, book_id) DO UPDATE SET score = excluded.score \
         RETURNING id, user_id, book_id, score",
    )
    .bind(user_id)
    .bind(book_id)
    .bind(score)
    .fetch_one(&mut *tx)
    .await?;

    books::refresh_stats(&mut *tx, book_id).await?;
    tx.commit().await?;
    tracing::debug!("User {} rated book {}: {}", user_id, book_id, score);

    Ok(rating)
}

/// The user's rating of a book, if any
pub async fn find_for(pool: &SqlitePool, user_id: i64, book_id: i64) -> Result<Option<Rating>> {
    Ok(sqlx::query_as::<_, Rating>(
        "SELECT id, user_id, book_id, score FROM ratings WHERE user_id = ? AND book_id = ?",
    )
    .bind(user_id)
    .bind(book_id)
    .fetch_optional(pool)
    .await?)
}

/// Mean of all scores for a book, `Unrated` when nobody rated it
pub async fn average(pool: &SqlitePool, book_id: i64) -> Result<RatingSummary> {
    let (count, total): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(score), 0) FROM ratings WHERE book_id = ?",
    )
    .bind(book_id)
    .fetch_one(pool)
    .await?;

    Ok(RatingSummary::from_totals(count, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_average_of_no_ratings_is_unrated() {
        let pool = test_support::pool().await;
        let dune = test_support::book(&pool, "Dune").await;

        assert_eq!(average(&pool, dune.id).await.unwrap(), RatingSummary::Unrated);
    }

    #[tokio::test]
    async fn test_average_is_exact_mean() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let bob = test_support::user(&pool, "bob").await;
        let dune = test_support::book(&pool, "Dune").await;

        upsert(&pool, alice.id, dune.id, 3).await.unwrap();
        upsert(&pool, bob.id, dune.id, 5).await.unwrap();

        let summary = average(&pool, dune.id).await.unwrap();
        assert_eq!(summary.average(), Some(4.0));
        assert_eq!(summary.count(), 2);

        let book = books::get(&pool, dune.id).await.unwrap();
        assert_eq!(book.avg_rating, Some(4.0));
        assert_eq!(book.num_of_ratings, Some(2));
    }

    #[tokio::test]
    async fn test_upsert_replaces_score() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let dune = test_support::book(&pool, "Dune").await;

        let first = upsert(&pool, alice.id, dune.id, 2).await.unwrap();
        let second = upsert(&pool, alice.id, dune.id, 5).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(find_for(&pool, alice.id, dune.id).await.unwrap().unwrap().score, 5);
        assert_eq!(average(&pool, dune.id).await.unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_rejected() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let dune = test_support::book(&pool, "Dune").await;

        assert!(matches!(
            upsert(&pool, alice.id, dune.id, 0).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            upsert(&pool, alice.id, dune.id, 6).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(find_for(&pool, alice.id, dune.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_rolls_back_rating() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let dune = test_support::book(&pool, "Dune").await;
        test_support::fail_book_updates(&pool).await;

        let result = upsert(&pool, alice.id, dune.id, 4).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(find_for(&pool, alice.id, dune.id).await.unwrap().is_none());
    }
}
