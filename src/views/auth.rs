use maud::{html, Markup};

use super::{field_errors, layout, Chrome};
use crate::forms::{LoginForm, SignupForm, ValidationErrors};

pub fn signup(chrome: &Chrome, form: &SignupForm, errors: Option<&ValidationErrors>) -> Markup {
    layout(
        "Sign up",
        chrome,
        html! {
            h2 { "Register" }
            form method="POST" action="/signup" {
                label for="username" { "Username" }
                input #username type="text" name="username" value=(form.username);
                (field_errors(errors, "username"))
                label for="email" { "Email" }
                input #email type="email" name="email" value=(form.email);
                (field_errors(errors, "email"))
                label for="password" { "Password" }
                input #password type="password" name="password";
                (field_errors(errors, "password"))
                button type="submit" { "Sign me up!" }
            }
        },
    )
}

pub fn login(chrome: &Chrome, form: &LoginForm, errors: Option<&ValidationErrors>) -> Markup {
    layout(
        "Log in",
        chrome,
        html! {
            h2 { "Welcome back" }
            form method="POST" action="/login" {
                label for="username" { "Username" }
                input #username type="text" name="username" value=(form.username);
                (field_errors(errors, "username"))
                label for="password" { "Password" }
                input #password type="password" name="password";
                (field_errors(errors, "password"))
                button type="submit" { "Log in" }
            }
        },
    )
}
