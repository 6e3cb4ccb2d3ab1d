//! Server-rendered HTML pages.

pub mod auth;
pub mod booklists;
pub mod books;
pub mod errors;
pub mod home;
pub mod reviews;
pub mod users;

use maud::{html, Markup, DOCTYPE};

use crate::forms::ValidationErrors;
use crate::models::User;
use crate::session::Flash;

/// Per-request page furniture: who is logged in and any pending notice
pub struct Chrome {
    pub user: Option<User>,
    pub flash: Option<Flash>,
}

impl Chrome {
    pub fn new(user: Option<User>, flash: Option<Flash>) -> Self {
        Self { user, flash }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }
}

pub fn layout(title: &str, chrome: &Chrome, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Bestseller Shelf" }
            }
            body {
                nav.navbar {
                    a.brand href="/" { "Bestseller Shelf" }
                    a href="/books" { "Books" }
                    a href="/booklists" { "Booklists" }
                    @if let Some(user) = &chrome.user {
                        a href="/users" { "Users" }
                        a href={ "/users/" (user.id) } { "@" (user.username) }
                        a href="/logout" { "Log out" }
                    } @else {
                        a href="/signup" { "Sign up" }
                        a href="/login" { "Log in" }
                    }
                }
                @if let Some(flash) = &chrome.flash {
                    div class={ "alert alert-" (flash.level.as_str()) } { (flash.message) }
                }
                main.container { (body) }
            }
        }
    }
}

/// Messages for one form field, if any
pub fn field_errors(errors: Option<&ValidationErrors>, field: &str) -> Markup {
    html! {
        @if let Some(errors) = errors {
            @for message in errors.for_field(field) {
                span.field-error { (message) }
            }
        }
    }
}

/// Username links, or a placeholder when empty
pub fn user_list(users: &[User], empty: &str) -> Markup {
    html! {
        @if users.is_empty() {
            p.empty { (empty) }
        } @else {
            ul.users {
                @for user in users {
                    li { a href={ "/users/" (user.id) } { "@" (user.username) } }
                }
            }
        }
    }
}
