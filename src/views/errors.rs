use axum::http::StatusCode;
use maud::{html, Markup, DOCTYPE};

/// Standalone error page; has no session context to draw from
pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let heading = match status {
        StatusCode::NOT_FOUND => "Page not found",
        s if s.is_server_error() => "Something went wrong",
        _ => "Request failed",
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (status.as_u16()) " | Bestseller Shelf" }
            }
            body {
                main.container {
                    h1 { (heading) }
                    p { (message) }
                    a href="/" { "Back to the home page" }
                }
            }
        }
    }
}
