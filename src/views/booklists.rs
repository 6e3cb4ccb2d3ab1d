use maud::{html, Markup};

use super::{layout, Chrome};
use crate::models::BookListRow;

pub fn index(chrome: &Chrome, rows: &[BookListRow]) -> Markup {
    layout(
        "Booklists",
        chrome,
        html! {
            h2 { "Everyone's booklists" }
            @if rows.is_empty() {
                p.empty { "No booklists yet." }
            } @else {
                table.booklists {
                    thead { tr { th { "Reader" } th { "Book" } th { "Author" } } }
                    tbody {
                        @for row in rows {
                            tr {
                                td { a href={ "/users/" (row.user_id) } { "@" (row.username) } }
                                td { a href={ "/books/" (row.book_id) } { (row.title) } }
                                td { (row.author) }
                            }
                        }
                    }
                }
            }
        },
    )
}
