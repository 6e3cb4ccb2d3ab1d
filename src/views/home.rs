use maud::{html, Markup};

use super::{field_errors, layout, Chrome};
use crate::api::{BookSummary, Category};
use crate::forms::ValidationErrors;

pub fn home(chrome: &Chrome, categories: &[Category], errors: Option<&ValidationErrors>) -> Markup {
    layout(
        "Home",
        chrome,
        html! {
            h3 { "Looking for a bestseller?" }
            form method="GET" action="/results" {
                label for="category" { "Category" }
                select #category name="category" {
                    option value="" { "Select one" }
                    @for category in categories {
                        option value=(category.key) { (category.label) }
                    }
                }
                (field_errors(errors, "category"))
                button type="submit" { "Search" }
            }
        },
    )
}

/// Path of a bestseller entry; titles may contain any character
pub fn api_book_path(category: &str, title: &str) -> String {
    format!("/results/{}/books/{}", category, urlencoding::encode(title))
}

fn book_card(book: &BookSummary, category: &str) -> Markup {
    html! {
        div.book-card {
            @if let Some(image) = &book.image {
                img src=(image) alt=(book.title);
            }
            h4 {
                a href=(api_book_path(category, &book.title)) { (book.title) }
            }
            p.author { "by " (book.author) }
        }
    }
}

pub fn results(chrome: &Chrome, category: &Category, books: &[BookSummary]) -> Markup {
    layout(
        &category.label,
        chrome,
        html! {
            h2 { (category.label) }
            @if books.is_empty() {
                p.empty { "No books to show." }
            } @else {
                ol.results {
                    @for book in books {
                        li { (book_card(book, &category.key)) }
                    }
                }
            }
        },
    )
}

pub fn api_book_detail(chrome: &Chrome, category: &Category, book: &BookSummary) -> Markup {
    let action = api_book_path(&category.key, &book.title);

    layout(
        &book.title,
        chrome,
        html! {
            div.book-detail {
                @if let Some(image) = &book.image {
                    img src=(image) alt=(book.title);
                }
                h2 { (book.title) }
                p.author { "by " (book.author) }
                p.category { a href={ "/results?category=" (category.key) } { (category.label) } }
                p { (book.description) }
                @if chrome.user.is_some() {
                    form method="POST" action=(action) {
                        button type="submit" { "Save to my list" }
                    }
                }
            }
        },
    )
}
