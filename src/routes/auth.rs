use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use super::{chrome, notice_chrome};
use crate::auth;
use crate::constants::MSG_INVALID_CREDENTIALS;
use crate::error::{AppError, Result};
use crate::forms::{LoginForm, SignupForm};
use crate::session::{Flash, FlashLevel, MaybeUser, Session};
use crate::views;
use crate::AppState;

pub async fn signup_form(MaybeUser(user): MaybeUser, session: Session) -> Response {
    let chrome = chrome(&session, user);
    views::auth::signup(&chrome, &SignupForm::default(), None).into_response()
}

/// Handle user signup
///
/// Creates the user, logs them in and redirects home. Invalid input or a
/// taken username/email re-presents the form.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let chrome = chrome(&session, None);
            let page = views::auth::signup(&chrome, &form, Some(&errors));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let user = match auth::signup(&state.pool, &input).await {
        Ok(user) => user,
        Err(AppError::Conflict(message)) => {
            let chrome = notice_chrome(&session, None, Flash::danger(message));
            let page = views::auth::signup(&chrome, &form, None);
            return Ok((StatusCode::CONFLICT, page).into_response());
        }
        Err(e) => return Err(e),
    };

    session.login(&user);
    Ok(session.redirect_with(FlashLevel::Success, "Signup successful!", "/"))
}

pub async fn login_form(MaybeUser(user): MaybeUser, session: Session) -> Response {
    let chrome = chrome(&session, user);
    views::auth::login(&chrome, &LoginForm::default(), None).into_response()
}

/// Handle user login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let chrome = chrome(&session, None);
            let page = views::auth::login(&chrome, &form, Some(&errors));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    match auth::authenticate(&state.pool, &input.username, &input.password).await? {
        Some(user) => {
            session.login(&user);
            let greeting = format!("Hello, {}!", user.username);
            Ok(session.redirect_with(FlashLevel::Success, greeting, "/"))
        }
        None => {
            let chrome = notice_chrome(&session, None, Flash::danger(MSG_INVALID_CREDENTIALS));
            let page = views::auth::login(&chrome, &form, None);
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
    }
}

/// Handle logout of user
pub async fn logout(session: Session) -> Response {
    session.logout();
    session.flash(FlashLevel::Success, "Logging out, goodbye");
    Redirect::to("/login").into_response()
}
