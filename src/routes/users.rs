use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use super::{chrome, notice_chrome, profile_path, PathParams};
use crate::auth;
use crate::constants::MSG_WRONG_PASSWORD;
use crate::db::{booklists, follows, reviews, users};
use crate::error::{AppError, Result};
use crate::forms::{EditProfileForm, UserSearch};
use crate::session::{CurrentUser, Flash, FlashLevel, Session};
use crate::views::{
    self,
    users::{FollowPage, Profile},
};
use crate::AppState;

/// List users, optionally filtered by a username search
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Query(search): Query<UserSearch>,
) -> Result<Response> {
    let term = search.term();
    let found = users::list(&state.pool, term).await?;

    let chrome = chrome(&session, Some(user));
    Ok(views::users::index(&chrome, &found, term).into_response())
}

/// Profile page: saved books, reviews and follow counts
pub async fn show_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    let owner = users::get(&state.pool, id).await?;
    let books = booklists::books_for_user(&state.pool, owner.id).await?;
    let reviews = reviews::for_user(&state.pool, owner.id).await?;
    let (followers, following) = follows::counts(&state.pool, owner.id).await?;
    let viewer_follows = follows::is_following(&state.pool, user.id, owner.id).await?;

    let profile = Profile {
        user: &owner,
        books: &books,
        reviews: &reviews,
        followers,
        following,
        viewer_follows,
    };

    let chrome = chrome(&session, Some(user));
    Ok(views::users::show(&chrome, &profile).into_response())
}

pub async fn show_following(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    let owner = users::get(&state.pool, id).await?;
    let following = follows::following(&state.pool, owner.id).await?;

    let chrome = chrome(&session, Some(user));
    Ok(views::users::follow_graph(&chrome, &owner, FollowPage::Following, &following).into_response())
}

pub async fn show_followers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    let owner = users::get(&state.pool, id).await?;
    let followers = follows::followers(&state.pool, owner.id).await?;

    let chrome = chrome(&session, Some(user));
    Ok(views::users::follow_graph(&chrome, &owner, FollowPage::Followers, &followers).into_response())
}

pub async fn show_user_booklist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    let owner = users::get(&state.pool, id).await?;
    let books = booklists::books_for_user(&state.pool, owner.id).await?;

    let chrome = chrome(&session, Some(user));
    Ok(views::users::booklist(&chrome, &owner, &books).into_response())
}

pub async fn show_user_reviews(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    let owner = users::get(&state.pool, id).await?;
    let reviews = reviews::for_user(&state.pool, owner.id).await?;

    let chrome = chrome(&session, Some(user));
    Ok(views::users::reviews(&chrome, &owner, &reviews).into_response())
}

/// Follow a user; following twice is a no-op
pub async fn follow_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    match follows::follow(&state.pool, user.id, id).await {
        Ok(_) => {}
        Err(AppError::InvalidInput(message)) => {
            return Ok(session.redirect_with(FlashLevel::Danger, message, &profile_path(user.id)));
        }
        Err(e) => return Err(e),
    }

    Ok(Redirect::to(&format!("/users/{}/following", user.id)).into_response())
}

/// Stop following a user; not following is a no-op
pub async fn stop_following(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    follows::unfollow(&state.pool, user.id, id).await?;

    Ok(Redirect::to(&format!("/users/{}/following", user.id)).into_response())
}

/// Follow or unfollow from the profile page
pub async fn toggle_follow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    PathParams(id): PathParams<i64>,
) -> Result<Response> {
    match follows::toggle(&state.pool, user.id, id).await {
        Ok(_) => Ok(Redirect::to(&profile_path(id)).into_response()),
        Err(AppError::InvalidInput(message)) => {
            Ok(session.redirect_with(FlashLevel::Danger, message, &profile_path(user.id)))
        }
        Err(e) => Err(e),
    }
}

pub async fn edit_profile_form(CurrentUser(user): CurrentUser, session: Session) -> Response {
    let form = EditProfileForm {
        username: user.username.clone(),
        email: user.email.clone(),
        password: String::new(),
    };

    let chrome = chrome(&session, Some(user));
    views::users::edit(&chrome, &form, None).into_response()
}

/// Update username and email after re-checking the current password
pub async fn edit_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Form(form): Form<EditProfileForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let chrome = chrome(&session, Some(user));
            let page = views::users::edit(&chrome, &form, Some(&errors));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    if auth::authenticate(&state.pool, &user.username, &input.password)
        .await?
        .is_none()
    {
        let chrome = notice_chrome(&session, Some(user), Flash::danger(MSG_WRONG_PASSWORD));
        let page = views::users::edit(&chrome, &form, None);
        return Ok((StatusCode::UNAUTHORIZED, page).into_response());
    }

    match users::update_profile(&state.pool, user.id, &input.username, &input.email).await {
        Ok(updated) => Ok(session.redirect_with(
            FlashLevel::Success,
            "Profile updated",
            &profile_path(updated.id),
        )),
        Err(AppError::Conflict(message)) => {
            let chrome = notice_chrome(&session, Some(user), Flash::danger(message));
            let page = views::users::edit(&chrome, &form, None);
            Ok((StatusCode::CONFLICT, page).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Delete the acting user's account and everything it owns
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
) -> Result<Response> {
    users::delete(&state.pool, user.id).await?;
    session.logout();

    Ok(session.redirect_with(FlashLevel::Info, "Your account has been deleted", "/signup"))
}
