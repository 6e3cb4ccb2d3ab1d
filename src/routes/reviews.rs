use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};

use super::{chrome, profile_path, unauthorized, PathParams};
use crate::constants::MSG_ALREADY_REVIEWED;
use crate::db::{books, reviews};
use crate::error::{AppError, Result};
use crate::forms::ReviewForm;
use crate::session::{CurrentUser, FlashLevel, Session};
use crate::views;
use crate::AppState;

fn book_path(book_id: i64) -> String {
    format!("/books/{}", book_id)
}

pub async fn new_review_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(book_id): PathParams<i64>,
) -> Result<Response> {
    let book = books::get(&state.pool, book_id).await?;

    if reviews::find_for(&state.pool, user.id, book.id).await?.is_some() {
        return Ok(session.redirect_with(FlashLevel::Info, MSG_ALREADY_REVIEWED, &book_path(book.id)));
    }

    let chrome = chrome(&session, Some(user));
    Ok(views::reviews::new(&chrome, &book, &ReviewForm::default(), None).into_response())
}

/// Create the acting user's review of a book
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(book_id): PathParams<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let book = books::get(&state.pool, book_id).await?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let chrome = chrome(&session, Some(user));
            let page = views::reviews::new(&chrome, &book, &form, Some(&errors));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    match reviews::add(&state.pool, user.id, book.id, &input).await {
        Ok(_) => Ok(session.redirect_with(
            FlashLevel::Success,
            "Review created successfully",
            &profile_path(user.id),
        )),
        Err(AppError::Conflict(message)) => {
            Ok(session.redirect_with(FlashLevel::Info, message, &book_path(book.id)))
        }
        Err(e) => Err(e),
    }
}

pub async fn edit_review_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    let review = reviews::get(&state.pool, id).await?;
    if !user.owns(review.user_id) {
        return Ok(unauthorized(&session, &user));
    }

    let form = ReviewForm::from(&review);
    let chrome = chrome(&session, Some(user));
    Ok(views::reviews::edit(&chrome, review.id, &form, None).into_response())
}

/// Replace the text and link of the acting user's review
pub async fn update_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let review = reviews::get(&state.pool, id).await?;
    if !user.owns(review.user_id) {
        return Ok(unauthorized(&session, &user));
    }

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let chrome = chrome(&session, Some(user));
            let page = views::reviews::edit(&chrome, review.id, &form, Some(&errors));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let updated = reviews::update(&state.pool, review.id, &input).await?;

    Ok(session.redirect_with(FlashLevel::Success, "Review updated", &book_path(updated.book_id)))
}

pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    let review = reviews::get(&state.pool, id).await?;
    if !user.owns(review.user_id) {
        return Ok(unauthorized(&session, &user));
    }

    reviews::delete(&state.pool, review.id).await?;

    Ok(session.redirect_with(FlashLevel::Success, "Review deleted", &profile_path(user.id)))
}
