use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use super::{chrome, profile_path, PathParams};
use crate::api::{find_in_category, Category};
use crate::constants::{MSG_ALREADY_ON_LIST, MSG_API_UNAVAILABLE};
use crate::db::{booklists, books};
use crate::error::{AppError, Result};
use crate::forms::{is_category_key, SearchForm, ValidationErrors};
use crate::models::{NewBook, SaveOutcome};
use crate::session::{CurrentUser, Flash, FlashLevel, MaybeUser, Session};
use crate::views::{self, Chrome};
use crate::AppState;

/// Category list, or an empty one plus a notice when the API is down
async fn categories_or_notice(state: &AppState) -> (Vec<Category>, Option<Flash>) {
    match state.books.categories().await {
        Ok(categories) => (categories, None),
        Err(e) => {
            tracing::warn!("Could not load categories: {}", e);
            (Vec::new(), Some(Flash::danger(MSG_API_UNAVAILABLE)))
        }
    }
}

async fn render_home(
    state: &AppState,
    session: &Session,
    user: Option<crate::models::User>,
    errors: Option<&ValidationErrors>,
) -> maud::Markup {
    let (categories, notice) = categories_or_notice(state).await;
    let chrome = Chrome::new(user, session.take_flash().or(notice));
    views::home::home(&chrome, &categories, errors)
}

/// Home page with the category picker
pub async fn show_home(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    session: Session,
) -> Response {
    render_home(&state, &session, user, None).await.into_response()
}

/// Current bestsellers for the chosen category
pub async fn show_results(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    session: Session,
    Query(form): Query<SearchForm>,
) -> Response {
    let key = match form.validate() {
        Ok(key) => key,
        Err(errors) => {
            let page = render_home(&state, &session, user, Some(&errors)).await;
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    let (books, notice) = match state.books.books_by_category(&key).await {
        Ok(books) => (books, None),
        Err(e) => {
            tracing::warn!("Could not load list {}: {}", key, e);
            (Vec::new(), Some(Flash::danger(MSG_API_UNAVAILABLE)))
        }
    };

    let chrome = Chrome::new(user, session.take_flash().or(notice));
    views::home::results(&chrome, &Category::from_key(&key), &books).into_response()
}

/// Details of one book on a current list
pub async fn show_api_book(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    session: Session,
    PathParams((category, title)): PathParams<(String, String)>,
) -> Result<Response> {
    if !is_category_key(&category) {
        return Err(AppError::BookNotFound);
    }

    let book = match find_in_category(state.books.as_ref(), &category, &title).await {
        Ok(Some(book)) => book,
        Ok(None) => return Err(AppError::BookNotFound),
        Err(e) => {
            tracing::warn!("Could not load list {}: {}", category, e);
            return Ok(session.redirect_with(FlashLevel::Danger, MSG_API_UNAVAILABLE, "/"));
        }
    };

    let chrome = chrome(&session, user);
    Ok(views::home::api_book_detail(&chrome, &Category::from_key(&category), &book).into_response())
}

/// Save a book from a current list to the user's booklist
///
/// The book row is created on first save and reused afterwards.
pub async fn save_api_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams((category, title)): PathParams<(String, String)>,
) -> Result<Response> {
    if !is_category_key(&category) {
        return Err(AppError::BookNotFound);
    }

    let summary = match find_in_category(state.books.as_ref(), &category, &title).await {
        Ok(Some(summary)) => summary,
        Ok(None) => return Err(AppError::BookNotFound),
        Err(e) => {
            tracing::warn!("Could not load list {}: {}", category, e);
            return Ok(session.redirect_with(FlashLevel::Danger, MSG_API_UNAVAILABLE, "/"));
        }
    };

    let book = books::find_or_create(&state.pool, &NewBook::from_summary(&summary, &category)).await?;

    match booklists::add(&state.pool, user.id, book.id).await? {
        SaveOutcome::Saved => session.flash(FlashLevel::Success, "Book added to your list"),
        SaveOutcome::AlreadySaved => session.flash(FlashLevel::Info, MSG_ALREADY_ON_LIST),
    }

    Ok(Redirect::to(&profile_path(user.id)).into_response())
}
