use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use super::{chrome, profile_path, unauthorized, PathParams};
use crate::constants::MSG_ALREADY_ON_LIST;
use crate::db::{booklists, books};
use crate::error::Result;
use crate::models::SaveOutcome;
use crate::session::{CurrentUser, FlashLevel, MaybeUser, Session};
use crate::views;
use crate::AppState;

pub async fn list_booklists(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    session: Session,
) -> Result<Response> {
    let rows = booklists::all(&state.pool).await?;

    let chrome = chrome(&session, user);
    Ok(views::booklists::index(&chrome, &rows).into_response())
}

/// Add a saved book to the acting user's own list
pub async fn add_to_booklist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams((user_id, book_id)): PathParams<(i64, i64)>,
) -> Result<Response> {
    if !user.owns(user_id) {
        return Ok(unauthorized(&session, &user));
    }

    let book = books::get(&state.pool, book_id).await?;
    let (level, message) = match booklists::add(&state.pool, user.id, book.id).await? {
        SaveOutcome::Saved => (FlashLevel::Success, "Book added to your list"),
        SaveOutcome::AlreadySaved => (FlashLevel::Info, MSG_ALREADY_ON_LIST),
    };

    Ok(session.redirect_with(level, message, &profile_path(user.id)))
}

/// Remove a book from the acting user's own list
pub async fn remove_from_booklist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams((user_id, book_id)): PathParams<(i64, i64)>,
) -> Result<Response> {
    if !user.owns(user_id) {
        return Ok(unauthorized(&session, &user));
    }

    let message = if booklists::remove(&state.pool, user.id, book_id).await? {
        "Book deleted from your list"
    } else {
        "That book is not on your list"
    };

    Ok(session.redirect_with(FlashLevel::Success, message, &profile_path(user.id)))
}
