//! Typed request inputs and their field-by-field validation.
//!
//! Every form deserializes with all fields defaulted so that a missing field
//! is reported as a field error instead of an extractor rejection. A form is
//! only turned into its `*Input` counterpart after validation succeeds.

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;

use crate::constants::{
    MAX_LOGIN_USERNAME_LEN, MAX_SCORE, MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_SCORE,
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static CATEGORY_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("category pattern is valid")
});

/// Field-level validation messages, in the order they were found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages attached to one field
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    /// Ok(value) when no error was recorded
    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Field checks
// =============================================================================

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
        return false;
    }
    true
}

fn max_len(errors: &mut ValidationErrors, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("Field cannot be longer than {} characters.", max));
    }
}

fn email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if !EMAIL_RE.is_match(value) {
        errors.add(field, "Invalid email address.");
    }
}

/// Absolute http(s) URL with a host
pub fn is_absolute_url(value: &str) -> bool {
    match reqwest::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Encoded bestseller list name, e.g. `hardcover-fiction`
pub fn is_category_key(value: &str) -> bool {
    CATEGORY_KEY_RE.is_match(value)
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validated signup data
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let username = self.username.trim();
        let email_addr = self.email.trim();

        if require(&mut errors, "username", username) {
            max_len(&mut errors, "username", username, MAX_USERNAME_LEN);
        }
        if require(&mut errors, "email", email_addr) {
            email(&mut errors, "email", email_addr);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Field must be at least {} characters long.", MIN_PASSWORD_LEN),
            );
        }

        errors.finish(SignupInput {
            username: username.to_string(),
            email: email_addr.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let username = self.username.trim();

        if require(&mut errors, "username", username) {
            max_len(&mut errors, "username", username, MAX_LOGIN_USERNAME_LEN);
        }
        if self.password.is_empty() {
            errors.add("password", "This field is required.");
        }

        errors.finish(LoginInput {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Profile edit; `password` is the current password, used to confirm
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditProfileForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl EditProfileForm {
    pub fn validate(&self) -> Result<ProfileInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let username = self.username.trim();
        let email_addr = self.email.trim();

        if require(&mut errors, "username", username) {
            max_len(&mut errors, "username", username, MAX_USERNAME_LEN);
        }
        if require(&mut errors, "email", email_addr) {
            email(&mut errors, "email", email_addr);
        }
        if self.password.is_empty() {
            errors.add("password", "This field is required.");
        }

        errors.finish(ProfileInput {
            username: username.to_string(),
            email: email_addr.to_string(),
            password: self.password.clone(),
        })
    }
}

// =============================================================================
// Search
// =============================================================================

/// Category picker on the home page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub category: String,
}

impl SearchForm {
    /// The validated list key
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let key = self.category.trim();

        if require(&mut errors, "category", key) && !is_category_key(key) {
            errors.add("category", "Select one of the listed categories.");
        }

        errors.finish(key.to_string())
    }
}

/// `?q=` on the user listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserSearch {
    pub q: Option<String>,
}

impl UserSearch {
    /// Trimmed search term, `None` when absent or blank
    pub fn term(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

// =============================================================================
// Reviews and ratings
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub summary: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub summary: String,
    pub url: Option<String>,
}

impl ReviewForm {
    pub fn validate(&self) -> Result<ReviewInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let summary = self.summary.trim();
        let url = self.url.trim();

        require(&mut errors, "summary", summary);
        if !url.is_empty() && !is_absolute_url(url) {
            errors.add("url", "Invalid URL.");
        }

        errors.finish(ReviewInput {
            summary: summary.to_string(),
            url: (!url.is_empty()).then(|| url.to_string()),
        })
    }
}

impl From<&crate::models::Review> for ReviewForm {
    fn from(review: &crate::models::Review) -> Self {
        Self {
            summary: review.summary.clone(),
            url: review.url.clone().unwrap_or_default(),
        }
    }
}

/// Rating picker on the book page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RatingForm {
    #[serde(rename = "book-rating")]
    pub score: String,
}

impl RatingForm {
    pub fn validate(&self) -> Result<i64, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let score = match self.score.trim().parse::<i64>() {
            Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => score,
            _ => {
                errors.add(
                    "book-rating",
                    format!("Score must be a whole number from {} to {}.", MIN_SCORE, MAX_SCORE),
                );
                0
            }
        };

        errors.finish(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_signup_valid() {
        let input = signup(" alice ", "a@x.com", "secret1").validate().unwrap();

        assert_eq!(input.username, "alice");
        assert_eq!(input.email, "a@x.com");
    }

    #[test]
    fn test_signup_reports_every_field() {
        let errors = signup("", "not-an-email", "123").validate().unwrap_err();

        assert_eq!(errors.for_field("username"), vec!["This field is required."]);
        assert_eq!(errors.for_field("email"), vec!["Invalid email address."]);
        assert_eq!(errors.for_field("password").len(), 1);
    }

    #[test]
    fn test_signup_username_too_long() {
        let errors = signup(&"a".repeat(41), "a@x.com", "secret1")
            .validate()
            .unwrap_err();

        assert_eq!(errors.for_field("username").len(), 1);
        assert!(errors.for_field("email").is_empty());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let form = LoginForm::default();

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.for_field("username").len(), 1);
        assert_eq!(errors.for_field("password").len(), 1);
    }

    #[test]
    fn test_search_category_key() {
        let ok = SearchForm {
            category: "hardcover-fiction".to_string(),
        };
        assert_eq!(ok.validate().unwrap(), "hardcover-fiction");

        let bad = SearchForm {
            category: "../secret".to_string(),
        };
        assert!(bad.validate().is_err());

        assert!(SearchForm::default().validate().is_err());
    }

    #[test]
    fn test_user_search_term() {
        assert_eq!(UserSearch { q: None }.term(), None);
        assert_eq!(UserSearch { q: Some("  ".to_string()) }.term(), None);
        assert_eq!(UserSearch { q: Some(" al ".to_string()) }.term(), Some("al"));
    }

    #[test]
    fn test_review_url_optional_but_absolute() {
        let no_url = ReviewForm {
            summary: "Great".to_string(),
            url: String::new(),
        };
        assert_eq!(
            no_url.validate().unwrap(),
            ReviewInput {
                summary: "Great".to_string(),
                url: None
            }
        );

        let relative = ReviewForm {
            summary: "Great".to_string(),
            url: "/reviews/1".to_string(),
        };
        assert_eq!(relative.validate().unwrap_err().for_field("url").len(), 1);

        let absolute = ReviewForm {
            summary: "Great".to_string(),
            url: "https://example.com/review".to_string(),
        };
        assert!(absolute.validate().is_ok());
    }

    #[test]
    fn test_review_summary_required() {
        let form = ReviewForm {
            summary: "   ".to_string(),
            url: String::new(),
        };

        assert_eq!(form.validate().unwrap_err().for_field("summary").len(), 1);
    }

    #[test]
    fn test_rating_range() {
        let rate = |s: &str| {
            RatingForm {
                score: s.to_string(),
            }
            .validate()
        };

        assert_eq!(rate("4").unwrap(), 4);
        assert!(rate("0").is_err());
        assert!(rate("6").is_err());
        assert!(rate("three").is_err());
    }
}
