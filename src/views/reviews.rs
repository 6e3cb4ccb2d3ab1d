use maud::{html, Markup};

use super::{field_errors, layout, Chrome};
use crate::forms::{ReviewForm, ValidationErrors};
use crate::models::Book;

fn review_fields(form: &ReviewForm, errors: Option<&ValidationErrors>) -> Markup {
    html! {
        label for="summary" { "Review" }
        textarea #summary name="summary" rows="6" { (form.summary) }
        (field_errors(errors, "summary"))
        label for="url" { "Link (optional)" }
        input #url type="url" name="url" value=(form.url);
        (field_errors(errors, "url"))
    }
}

pub fn new(chrome: &Chrome, book: &Book, form: &ReviewForm, errors: Option<&ValidationErrors>) -> Markup {
    layout(
        "New review",
        chrome,
        html! {
            h2 { "Review " (book.title) }
            form method="POST" action={ "/books/" (book.id) "/reviews/add" } {
                (review_fields(form, errors))
                button type="submit" { "Add review" }
            }
        },
    )
}

pub fn edit(chrome: &Chrome, review_id: i64, form: &ReviewForm, errors: Option<&ValidationErrors>) -> Markup {
    layout(
        "Edit review",
        chrome,
        html! {
            h2 { "Edit your review" }
            form method="POST" action={ "/reviews/" (review_id) "/edit" } {
                (review_fields(form, errors))
                button type="submit" { "Update review" }
            }
        },
    )
}
