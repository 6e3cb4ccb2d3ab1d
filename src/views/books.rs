use maud::{html, Markup};

use super::{field_errors, layout, user_list, Chrome};
use crate::api::BestsellerHistory;
use crate::constants::{MAX_SCORE, MIN_SCORE};
use crate::forms::ValidationErrors;
use crate::models::{Book, RatingSummary, ReviewWithAuthor, User};

pub fn index(chrome: &Chrome, books: &[Book]) -> Markup {
    layout(
        "Books",
        chrome,
        html! {
            h2 { "All saved books" }
            @if books.is_empty() {
                p.empty { "Nobody has saved a book yet." }
            } @else {
                ul.books {
                    @for book in books {
                        li {
                            a href={ "/books/" (book.id) } { (book.title) }
                            " by " (book.author)
                        }
                    }
                }
            }
        },
    )
}

/// Everything shown on a saved book's page
pub struct BookPage<'a> {
    pub book: &'a Book,
    pub rating: RatingSummary,
    pub own_score: Option<i64>,
    pub reviews: &'a [ReviewWithAuthor],
    pub savers: &'a [User],
    pub on_own_list: bool,
    pub has_reviewed: bool,
    pub history: &'a [BestsellerHistory],
}

fn rating_form(book: &Book, own_score: Option<i64>, errors: Option<&ValidationErrors>) -> Markup {
    html! {
        form method="POST" action={ "/books/" (book.id) } {
            label for="book-rating" { "Your rating" }
            select #book-rating name="book-rating" {
                @for score in MIN_SCORE..=MAX_SCORE {
                    option value=(score) selected[own_score == Some(score)] { (score) }
                }
            }
            (field_errors(errors, "book-rating"))
            button type="submit" { "Rate" }
        }
    }
}

fn history_table(history: &[BestsellerHistory]) -> Markup {
    html! {
        @for record in history {
            @if let Some(publisher) = &record.publisher {
                p.publisher { "Published by " (publisher) }
            }
            @if !record.ranks.is_empty() {
                table.history {
                    thead { tr { th { "List" } th { "Date" } th { "Rank" } th { "Weeks on list" } } }
                    tbody {
                        @for rank in &record.ranks {
                            tr {
                                td { (rank.list_name) }
                                td { (rank.bestsellers_date.as_deref().unwrap_or("")) }
                                td { (rank.rank) }
                                td { (rank.weeks_on_list) }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn detail(chrome: &Chrome, page: &BookPage, errors: Option<&ValidationErrors>) -> Markup {
    let book = page.book;
    let viewer_id = chrome.user_id();

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
                @if let Some(date) = book.publication_dt {
                    p.published { "Published " (date.to_string()) }
                }
                p { (book.description) }
                p.rating { "Average rating: " (page.rating.to_string()) }
                (rating_form(book, page.own_score, errors))
                @if let Some(user_id) = viewer_id {
                    @if !page.on_own_list {
                        form method="POST" action={ "/booklists/" (user_id) "/add/" (book.id) } {
                            button type="submit" { "Save to my list" }
                        }
                    }
                    @if !page.has_reviewed {
                        a.button href={ "/books/" (book.id) "/reviews/add" } { "Write a review" }
                    }
                }
            }
            h3 { "Reviews" }
            @if page.reviews.is_empty() {
                p.empty { "No reviews yet." }
            } @else {
                ul.reviews {
                    @for review in page.reviews {
                        li {
                            a href={ "/users/" (review.user_id) } { "@" (review.username) }
                            p { (review.summary) }
                            @if let Some(url) = &review.url {
                                a href=(url) rel="nofollow" { (url) }
                            }
                            @if viewer_id == Some(review.user_id) {
                                a href={ "/reviews/" (review.id) "/edit" } { "Edit" }
                                form.inline method="POST" action={ "/reviews/" (review.id) "/delete" } {
                                    button type="submit" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
            h3 { "Saved by" }
            (user_list(page.savers, "Nobody has saved this book yet."))
            @if !page.history.is_empty() {
                h3 { "Bestseller history" }
                (history_table(page.history))
            }
        },
    )
}
