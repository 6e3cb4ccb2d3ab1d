pub mod book;
pub mod booklist;
pub mod follow;
pub mod rating;
pub mod review;
pub mod user;

pub use book::{Book, NewBook};
pub use booklist::{BookListEntry, BookListRow, SaveOutcome};
pub use follow::FollowState;
pub use rating::{Rating, RatingSummary};
pub use review::{Review, ReviewWithAuthor, ReviewWithBook};
pub use user::User;
