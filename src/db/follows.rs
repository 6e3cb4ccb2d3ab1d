use sqlx::SqlitePool;

use crate::db::users;
use crate::error::{AppError, Result};
use crate::models::{FollowState, User};

fn reject_self_follow(follower_id: i64, followed_id: i64) -> Result<()> {
    if follower_id == followed_id {
        return Err(AppError::InvalidInput("You cannot follow yourself.".to_string()));
    }
    Ok(())
}

/// Make `follower_id` follow `followed_id`; already following is fine
pub async fn follow(pool: &SqlitePool, follower_id: i64, followed_id: i64) -> Result<FollowState> {
    reject_self_follow(follower_id, followed_id)?;
    if !users::exists(pool, followed_id).await? {
        return Err(AppError::UserNotFound);
    }

    sqlx::query(
        "INSERT INTO follows (follower_id, followed_id) VALUES (?, ?) \
         ON CONFLICT(follower_id, followed_id) DO NOTHING",
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(pool)
    .await?;

    Ok(FollowState::Following)
}

/// Remove the edge if present; not following is fine
pub async fn unfollow(
    pool: &SqlitePool,
    follower_id: i64,
    followed_id: i64,
) -> Result<FollowState> {
    sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
        .bind(follower_id)
        .bind(followed_id)
        .execute(pool)
        .await?;

    Ok(FollowState::NotFollowing)
}

/// Flip the edge: remove it if present, add it otherwise
pub async fn toggle(pool: &SqlitePool, follower_id: i64, followed_id: i64) -> Result<FollowState> {
    reject_self_follow(follower_id, followed_id)?;

    let mut tx = pool.begin().await?;

    if !users::exists(&mut *tx, followed_id).await? {
        return Err(AppError::UserNotFound);
    }

    let removed = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
        .bind(follower_id)
        .bind(followed_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let state = if removed > 0 {
        FollowState::NotFollowing
    } else {
        sqlx::query("INSERT INTO follows (follower_id, followed_id) VALUES (?, ?)")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&mut *tx)
            .await?;
        FollowState::Following
    };

    tx.commit().await?;

    tracing::debug!(
        "Follow {} -> {} is now {:?}",
        follower_id,
        followed_id,
        state
    );

    Ok(state)
}

pub async fn is_following(pool: &SqlitePool, follower_id: i64, followed_id: i64) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = ? AND followed_id = ?")
            .bind(follower_id)
            .bind(followed_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

/// Users who follow `user_id`
pub async fn followers(pool: &SqlitePool, user_id: i64) -> Result<Vec<User>> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.email, u.password, u.created_at \
         FROM users u JOIN follows f ON f.follower_id = u.id \
         WHERE f.followed_id = ? ORDER BY u.username",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Users that `user_id` follows
pub async fn following(pool: &SqlitePool, user_id: i64) -> Result<Vec<User>> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.email, u.password, u.created_at \
         FROM users u JOIN follows f ON f.followed_id = u.id \
         WHERE f.follower_id = ? ORDER BY u.username",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// (followers, following) counts for a profile
pub async fn counts(pool: &SqlitePool, user_id: i64) -> Result<(i64, i64)> {
    Ok(sqlx::query_as::<_, (i64, i64)>(
        "SELECT \
             (SELECT COUNT(*) FROM follows WHERE followed_id = ?1), \
             (SELECT COUNT(*) FROM follows WHERE follower_id = ?1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?)
}
