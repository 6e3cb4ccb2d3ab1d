use maud::{html, Markup};

use super::{field_errors, layout, user_list, Chrome};
use crate::forms::{EditProfileForm, ValidationErrors};
use crate::models::{Book, ReviewWithBook, User};

pub fn index(chrome: &Chrome, users: &[User], search: Option<&str>) -> Markup {
    layout(
        "Users",
        chrome,
        html! {
            h2 { "Users" }
            form method="GET" action="/users" {
                input type="search" name="q" placeholder="Search by username" value=[search];
                button type="submit" { "Search" }
            }
            (user_list(users, "Sorry, no users found"))
        },
    )
}

/// Everything shown on a profile page
pub struct Profile<'a> {
    pub user: &'a User,
    pub books: &'a [Book],
    pub reviews: &'a [ReviewWithBook],
    pub followers: i64,
    pub following: i64,
    pub viewer_follows: bool,
}

fn profile_header(chrome: &Chrome, profile: &Profile) -> Markup {
    let user = profile.user;
    let own_profile = chrome.user_id() == Some(user.id);

    html! {
        div.profile-header {
            h2 { "@" (user.username) }
            ul.stats {
                li { a href={ "/users/" (user.id) "/books" } { "Books " (profile.books.len()) } }
                li { a href={ "/users/" (user.id) "/reviews" } { "Reviews " (profile.reviews.len()) } }
                li { a href={ "/users/" (user.id) "/followers" } { "Followers " (profile.followers) } }
                li { a href={ "/users/" (user.id) "/following" } { "Following " (profile.following) } }
            }
            @if own_profile {
                a.button href="/users/profile" { "Edit profile" }
                form method="POST" action="/users/delete" {
                    button.danger type="submit" { "Delete profile" }
                }
            } @else {
                form method="POST" action={ "/users/toggle-follow/" (user.id) } {
                    @if profile.viewer_follows {
                        button type="submit" { "Unfollow" }
                    } @else {
                        button type="submit" { "Follow" }
                    }
                }
            }
        }
    }
}

pub fn show(chrome: &Chrome, profile: &Profile) -> Markup {
    let own_profile = chrome.user_id() == Some(profile.user.id);

    layout(
        &profile.user.username,
        chrome,
        html! {
            (profile_header(chrome, profile))
            h3 { "Booklist" }
            (book_table(profile.user, profile.books, own_profile))
            h3 { "Reviews" }
            (review_list(profile.reviews, own_profile))
        },
    )
}

fn book_table(owner: &User, books: &[Book], own_list: bool) -> Markup {
    html! {
        @if books.is_empty() {
            p.empty { "No books saved yet." }
        } @else {
            ul.booklist {
                @for book in books {
                    li {
                        a href={ "/books/" (book.id) } { (book.title) }
                        " by " (book.author)
                        @if own_list {
                            form.inline method="POST"
                                action={ "/booklists/" (owner.id) "/delete/" (book.id) } {
                                button type="submit" { "Remove" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn review_list(reviews: &[ReviewWithBook], own_reviews: bool) -> Markup {
    html! {
        @if reviews.is_empty() {
            p.empty { "No reviews yet." }
        } @else {
            ul.reviews {
                @for review in reviews {
                    li {
                        a href={ "/books/" (review.book_id) } { (review.title) }
                        p { (review.summary) }
                        @if let Some(url) = &review.url {
                            a href=(url) rel="nofollow" { (url) }
                        }
                        @if own_reviews {
                            a href={ "/reviews/" (review.id) "/edit" } { "Edit" }
                            form.inline method="POST" action={ "/reviews/" (review.id) "/delete" } {
                                button type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn booklist(chrome: &Chrome, owner: &User, books: &[Book]) -> Markup {
    let own_list = chrome.user_id() == Some(owner.id);

    layout(
        &format!("{}'s books", owner.username),
        chrome,
        html! {
            h2 { "@" (owner.username) "'s books" }
            (book_table(owner, books, own_list))
        },
    )
}

pub fn reviews(chrome: &Chrome, owner: &User, reviews: &[ReviewWithBook]) -> Markup {
    let own_reviews = chrome.user_id() == Some(owner.id);

    layout(
        &format!("{}'s reviews", owner.username),
        chrome,
        html! {
            h2 { "@" (owner.username) "'s reviews" }
            (review_list(reviews, own_reviews))
        },
    )
}

/// Which side of the follow graph a page lists
#[derive(Debug, Clone, Copy)]
pub enum FollowPage {
    Followers,
    Following,
}

pub fn follow_graph(chrome: &Chrome, owner: &User, page: FollowPage, users: &[User]) -> Markup {
    let (heading, empty) = match page {
        FollowPage::Followers => ("Followers", "No followers yet."),
        FollowPage::Following => ("Following", "Not following anyone yet."),
    };

    layout(
        heading,
        chrome,
        html! {
            h2 { "@" (owner.username) " · " (heading) }
            (user_list(users, empty))
        },
    )
}

pub fn edit(chrome: &Chrome, form: &EditProfileForm, errors: Option<&ValidationErrors>) -> Markup {
    let user_id = chrome.user_id().unwrap_or_default();

    layout(
        "Edit profile",
        chrome,
        html! {
            h2 { "Edit your profile" }
            form method="POST" action="/users/profile" {
                label for="username" { "Username" }
                input #username type="text" name="username" value=(form.username);
                (field_errors(errors, "username"))
                label for="email" { "E-mail" }
                input #email type="email" name="email" value=(form.email);
                (field_errors(errors, "email"))
                label for="password" { "Current password" }
                input #password type="password" name="password";
                (field_errors(errors, "password"))
                button type="submit" { "Edit this user!" }
                a href={ "/users/" (user_id) } { "Cancel" }
            }
        },
    )
}
