/// Lowest accepted rating score
pub const MIN_SCORE: i64 = 1;

/// Highest accepted rating score
pub const MAX_SCORE: i64 = 5;

/// Maximum username length at signup and profile edit
pub const MAX_USERNAME_LEN: usize = 40;

/// Maximum username length accepted by the login form
pub const MAX_LOGIN_USERNAME_LEN: usize = 30;

/// Minimum password length at signup
pub const MIN_PASSWORD_LEN: usize = 6;

/// Cookie holding the signed identity of the logged-in user
pub const SESSION_COOKIE: &str = "curr_user";

/// Cookie holding the pending flash notice
pub const FLASH_COOKIE: &str = "flash";

// =============================================================================
// User-facing notices
// =============================================================================

pub const MSG_LOGIN_REQUIRED: &str = "Please signup and/or login.";

pub const MSG_UNAUTHORIZED: &str = "Access unauthorized.";

/// Deliberately does not say which field collided
pub const MSG_ACCOUNT_TAKEN: &str = "Username or email already taken";

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials.";

pub const MSG_WRONG_PASSWORD: &str = "Wrong password, please try again.";

pub const MSG_ALREADY_ON_LIST: &str = "This book is already on your list";

pub const MSG_ALREADY_REVIEWED: &str = "You have already submitted a review for this book!";

pub const MSG_API_UNAVAILABLE: &str =
    "The bestseller service is unavailable right now, please try again later.";

pub const MSG_NOT_RATED: &str = "Not rated yet";
