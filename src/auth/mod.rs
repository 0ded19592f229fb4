pub mod handlers;
pub mod middleware;
pub mod password;

/// Session key whose presence marks a logged-in browser.
pub const SESSION_USER_KEY: &str = "username";
