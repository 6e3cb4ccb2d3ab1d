//! Cookie-backed session identity and flash notices.
//!
//! The session cookie carries `"{user_id}.{signature}"`, where the signature
//! is an HMAC-SHA256 of the id under the configured secret. Handlers never
//! read it directly: they take a [`CurrentUser`] or [`MaybeUser`] parameter,
//! so the acting identity is always an explicit value.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

use crate::constants::{FLASH_COOKIE, MSG_LOGIN_REQUIRED, SESSION_COOKIE};
use crate::db::users;
use crate::error::Result;
use crate::models::User;
use crate::security::{sign_hmac, verify_hmac};
use crate::AppState;

/// Severity of a flash notice, used as a CSS class suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Danger => "danger",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(FlashLevel::Success),
            "info" => Some(FlashLevel::Info),
            "danger" => Some(FlashLevel::Danger),
            _ => None,
        }
    }
}

/// A one-shot notice shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }

    /// Hex keeps arbitrary message text cookie-safe
    fn encode(&self) -> String {
        hex::encode(format!("{}\n{}", self.level.as_str(), self.message))
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = hex::decode(value).ok()?;
        let text = String::from_utf8(bytes).ok()?;
        let (level, message) = text.split_once('\n')?;
        Some(Self::new(FlashLevel::parse(level)?, message))
    }
}

/// Signed cookie value for a user id
pub fn encode_identity(user_id: i64, secret: &str) -> String {
    let id = user_id.to_string();
    format!("{}.{}", id, sign_hmac(&id, secret))
}

/// User id from a signed cookie value, `None` if tampered or malformed
pub fn decode_identity(value: &str, secret: &str) -> Option<i64> {
    let (id, signature) = value.split_once('.')?;
    if !verify_hmac(id, signature, secret) {
        tracing::warn!("Session cookie with invalid signature");
        return None;
    }
    id.parse().ok()
}

/// Per-request handle on the session and flash cookies
#[derive(Clone)]
pub struct Session {
    cookies: Cookies,
    secret: String,
    secure: bool,
}

impl Session {
    pub fn new(cookies: Cookies, secret: impl Into<String>, secure: bool) -> Self {
        Self {
            cookies,
            secret: secret.into(),
            secure,
        }
    }

    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    fn clear(&self, name: &'static str) {
        self.cookies
            .remove(Cookie::build((name, "")).path("/").build());
    }

    /// Id of the logged-in user, if the cookie is present and untampered
    pub fn user_id(&self) -> Option<i64> {
        let cookie = self.cookies.get(SESSION_COOKIE)?;
        decode_identity(cookie.value(), &self.secret)
    }

    /// Store `user` as the session identity, replacing any previous one
    pub fn login(&self, user: &User) {
        let value = encode_identity(user.id, &self.secret);
        self.cookies.add(self.cookie(SESSION_COOKIE, value));
    }

    pub fn logout(&self) {
        self.clear(SESSION_COOKIE);
    }

    /// Queue a notice for the next rendered page
    pub fn flash(&self, level: FlashLevel, message: impl Into<String>) {
        let flash = Flash::new(level, message);
        self.cookies.add(self.cookie(FLASH_COOKIE, flash.encode()));
    }

    /// Pop the pending notice, if any
    pub fn take_flash(&self) -> Option<Flash> {
        let cookie = self.cookies.get(FLASH_COOKIE)?;
        self.clear(FLASH_COOKIE);
        Flash::decode(cookie.value())
    }

    /// Flash a notice and redirect; the standard outcome for soft failures
    pub fn redirect_with(
        &self,
        level: FlashLevel,
        message: impl Into<String>,
        to: &str,
    ) -> Response {
        self.flash(level, message);
        Redirect::to(to).into_response()
    }

    /// Resolve the session identity to a user row
    ///
    /// A cookie naming a deleted user is cleared and treated as logged out.
    pub async fn load_user(&self, state: &AppState) -> Result<Option<User>> {
        let Some(user_id) = self.user_id() else {
            return Ok(None);
        };

        let user = users::find_by_id(&state.pool, user_id).await?;
        if user.is_none() {
            tracing::info!("Session refers to missing user {}, clearing", user_id);
            self.logout();
        }

        Ok(user)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await?;
        Ok(Session::new(
            cookies,
            state.config.secret_key.clone(),
            state.config.secure_cookies(),
        ))
    }
}

/// The logged-in user; requests without one are redirected home with a notice
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session.load_user(state).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(session.redirect_with(FlashLevel::Danger, MSG_LOGIN_REQUIRED, "/")),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// The logged-in user, if any
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        session
            .load_user(state)
            .await
            .map(MaybeUser)
            .map_err(IntoResponse::into_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-0123";

    #[test]
    fn test_identity_round_trip() {
        let value = encode_identity(42, SECRET);

        assert_eq!(decode_identity(&value, SECRET), Some(42));
    }

    #[test]
    fn test_tampered_identity_is_rejected() {
        let value = encode_identity(42, SECRET);
        let (_, signature) = value.split_once('.').unwrap();
        let forged = format!("43.{}", signature);

        assert_eq!(decode_identity(&forged, SECRET), None);
        assert_eq!(decode_identity(&value, "another-secret-key"), None);
        assert_eq!(decode_identity("42", SECRET), None);
    }

    #[test]
    fn test_flash_encoding() {
        let flash = Flash::new(FlashLevel::Success, "Book added to your list");

        let decoded = Flash::decode(&flash.encode()).unwrap();

        assert_eq!(decoded, flash);
        assert!(Flash::decode("not hex").is_none());
        assert!(Flash::decode(&hex::encode("bogus\nmessage")).is_none());
    }
}
