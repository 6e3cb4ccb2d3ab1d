use sqlx::SqlitePool;

use crate::db::users;
use crate::error::{AppError, Result};
use crate::forms::SignupInput;
use crate::models::User;
use crate::security::{hash_password, verify_password};

/// Register a new account
///
/// The password is hashed with Argon2id before it reaches the database. A
/// taken username or email fails with `Conflict` and writes nothing; the
/// message does not say which of the two collided.
pub async fn signup(pool: &SqlitePool, input: &SignupInput) -> Result<User> {
    let password = input.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await?
        .map_err(AppError::PasswordHash)?;

    let user = users::insert(pool, &input.username, &input.email, &password_hash).await?;
    tracing::info!("New user registered: {}", user.id);

    Ok(user)
}

/// Look up a user by credentials
///
/// Unknown username and wrong password both yield `Ok(None)`. Only
/// malformed input (an empty username) is an error.
pub async fn authenticate(pool: &SqlitePool, username: &str, password: &str) -> Result<Option<User>> {
    if username.trim().is_empty() {
        return Err(AppError::InvalidInput("Username is required".to_string()));
    }

    let Some(user) = users::find_by_username(pool, username).await? else {
        tracing::debug!("Login attempt for unknown user");
        return Ok(None);
    };

    let password = password.to_string();
    let stored_hash = user.password.clone();
    let matches =
        tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await?;

    if !matches {
        tracing::info!("Failed login for user {}", user.id);
    }

    Ok(matches.then_some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn alice() -> SignupInput {
        SignupInput {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_authenticate() {
        let pool = test_support::pool().await;

        let user = signup(&pool, &alice()).await.unwrap();
        assert_ne!(user.password, "secret1");

        let found = authenticate(&pool, "alice", "secret1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let wrong = authenticate(&pool, "alice", "wrong").await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_is_no_match() {
        let pool = test_support::pool().await;

        assert!(authenticate(&pool, "nobody", "secret1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_signup_writes_nothing() {
        let pool = test_support::pool().await;
        signup(&pool, &alice()).await.unwrap();

        let mut again = alice();
        again.email = "other@x.com".to_string();
        let result = signup(&pool, &again).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(users::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_username_is_malformed() {
        let pool = test_support::pool().await;

        assert!(matches!(
            authenticate(&pool, " ", "secret1").await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
