use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};

use super::{chrome, PathParams};
use crate::constants::MSG_API_UNAVAILABLE;
use crate::db::{booklists, books, ratings, reviews};
use crate::error::Result;
use crate::forms::{RatingForm, ValidationErrors};
use crate::models::User;
use crate::session::{CurrentUser, Flash, FlashLevel, MaybeUser, Session};
use crate::views::{self, books::BookPage, Chrome};
use crate::AppState;

/// Every saved book, ordered by title
pub async fn list_books(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    session: Session,
) -> Result<Response> {
    let all = books::list_by_title(&state.pool).await?;

    let chrome = chrome(&session, user);
    Ok(views::books::index(&chrome, &all).into_response())
}

/// Gather and render the detail page for one book
///
/// Bestseller history comes from the external API; when that fails the page
/// still renders, without history and with an info notice.
async fn render_book(
    state: &AppState,
    session: &Session,
    user: User,
    book_id: i64,
    errors: Option<&ValidationErrors>,
) -> Result<maud::Markup> {
    let book = books::get(&state.pool, book_id).await?;
    let rating = ratings::average(&state.pool, book.id).await?;
    let own_score = ratings::find_for(&state.pool, user.id, book.id)
        .await?
        .map(|r| r.score);
    let book_reviews = reviews::for_book(&state.pool, book.id).await?;
    let savers = booklists::users_for_book(&state.pool, book.id).await?;
    let on_own_list = booklists::find(&state.pool, user.id, book.id).await?.is_some();
    let has_reviewed = reviews::find_for(&state.pool, user.id, book.id).await?.is_some();

    let (history, notice) = match state.books.history(&book.title, &book.author).await {
        Ok(history) => (history, None),
        Err(e) => {
            tracing::warn!("Could not load history for book {}: {}", book.id, e);
            (Vec::new(), Some(Flash::new(FlashLevel::Info, MSG_API_UNAVAILABLE)))
        }
    };

    let page = BookPage {
        book: &book,
        rating,
        own_score,
        reviews: &book_reviews,
        savers: &savers,
        on_own_list,
        has_reviewed,
        history: &history,
    };

    let chrome = Chrome::new(Some(user), session.take_flash().or(notice));
    Ok(views::books::detail(&chrome, &page, errors))
}

/// Book detail with reviews, savers and average rating
pub async fn show_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    Ok(render_book(&state, &session, user, id, None).await?.into_response())
}

/// Set the acting user's score for a book
pub async fn rate_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
    Form(form): Form<RatingForm>,
) -> Result<Response> {
    let score = match form.validate() {
        Ok(score) => score,
        Err(errors) => {
            let page = render_book(&state, &session, user, id, Some(&errors)).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let book = books::get(&state.pool, id).await?;
    ratings::upsert(&state.pool, user.id, book.id, score).await?;

    Ok(session.redirect_with(FlashLevel::Success, "Rating saved", &format!("/books/{}", book.id)))
}
