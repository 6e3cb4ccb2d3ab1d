use serde::Serialize;
use std::fmt;

use crate::constants::{MAX_SCORE, MIN_SCORE, MSG_NOT_RATED};

/// A user's score for a book, at most one per (user, book)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub score: i64,
}

impl Rating {
    /// Validate that a score lies within the accepted range
    pub fn validate_score(score: i64) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&score)
    }
}

/// Aggregate of all scores for a book
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingSummary {
    /// No ratings yet; distinct from an average of zero
    Unrated,
    Rated { average: f64, count: i64 },
}

impl RatingSummary {
    /// Build the summary from a row count and score total
    pub fn from_totals(count: i64, total: i64) -> Self {
        if count == 0 {
            RatingSummary::Unrated
        } else {
            RatingSummary::Rated {
                average: total as f64 / count as f64,
                count,
            }
        }
    }

    pub fn average(&self) -> Option<f64> {
        match self {
            RatingSummary::Unrated => None,
            RatingSummary::Rated { average, .. } => Some(*average),
        }
    }

    pub fn count(&self) -> i64 {
        match self {
            RatingSummary::Unrated => 0,
            RatingSummary::Rated { count, .. } => *count,
        }
    }
}

impl fmt::Display for RatingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingSummary::Unrated => f.write_str(MSG_NOT_RATED),
            RatingSummary::Rated { average, count } => {
                write!(f, "{:.1} / {} ({} ratings)", average, MAX_SCORE, count)
            }
        }
    }
}
