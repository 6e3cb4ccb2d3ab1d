pub mod auth;
pub mod booklists;
pub mod books;
pub mod health;
pub mod home;
pub mod reviews;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::Response,
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::constants::MSG_UNAUTHORIZED;
use crate::error::AppError;
use crate::models::User;
use crate::session::{Flash, FlashLevel, Session};
use crate::views::Chrome;
use crate::AppState;

pub use health::health_check;

/// Build the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Bestseller lists
        .route("/", get(home::show_home))
        .route("/results", get(home::show_results))
        .route(
            "/results/:category/books/:title",
            get(home::show_api_book).post(home::save_api_book),
        )
        // Accounts
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        // Users and the follow graph
        .route("/users", get(users::list_users))
        .route(
            "/users/profile",
            get(users::edit_profile_form).post(users::edit_profile),
        )
        .route("/users/delete", post(users::delete_user))
        .route("/users/follow/:id", post(users::follow_user))
        .route("/users/stop-following/:id", post(users::stop_following))
        .route("/users/toggle-follow/:id", post(users::toggle_follow))
        .route("/users/:id", get(users::show_user))
        .route("/users/:id/following", get(users::show_following))
        .route("/users/:id/followers", get(users::show_followers))
        .route("/users/:id/books", get(users::show_user_booklist))
        .route("/users/:id/reviews", get(users::show_user_reviews))
        // Saved books, ratings and reviews
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::show_book).post(books::rate_book))
        .route(
            "/books/:id/reviews/add",
            get(reviews::new_review_form).post(reviews::create_review),
        )
        .route(
            "/reviews/:id/edit",
            get(reviews::edit_review_form).post(reviews::update_review),
        )
        .route("/reviews/:id/delete", post(reviews::delete_review))
        // Booklists
        .route("/booklists", get(booklists::list_booklists))
        .route(
            "/booklists/:user_id/add/:book_id",
            post(booklists::add_to_booklist),
        )
        .route(
            "/booklists/:user_id/delete/:book_id",
            post(booklists::remove_from_booklist),
        )
        .fallback(not_found)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(crate) fn profile_path(user_id: i64) -> String {
    format!("/users/{}", user_id)
}

/// Page furniture for a handler that already knows the acting user
pub(crate) fn chrome(session: &Session, user: Option<User>) -> Chrome {
    Chrome::new(user, session.take_flash())
}

/// Page furniture for a re-rendered form with its own notice; a pending flash is dropped
pub(crate) fn notice_chrome(session: &Session, user: Option<User>, notice: Flash) -> Chrome {
    session.take_flash();
    Chrome::new(user, Some(notice))
}

/// The outcome of every failed ownership check: notice, back to own profile
pub(crate) fn unauthorized(session: &Session, user: &User) -> Response {
    tracing::warn!("User {} attempted an unauthorized action", user.id);
    session.redirect_with(FlashLevel::Danger, MSG_UNAUTHORIZED, &profile_path(user.id))
}

/// Any path no route matches
async fn not_found() -> AppError {
    AppError::PageNotFound
}

/// Path parameters that render the 404 page when they fail to parse
pub struct PathParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(params)) => Ok(PathParams(params)),
            Err(rejection) => {
                tracing::debug!("Unusable path parameters: {}", rejection);
                Err(AppError::PageNotFound)
            }
        }
    }
}
