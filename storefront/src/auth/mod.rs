//! Admin authentication: signed session cookies and password login.
//!
//! Sessions are stateless. A token is `<payload>.<mac>` where the payload is
//! 32 random bytes and the mac is HMAC-SHA256 over the payload's hex form,
//! both lowercase hex. Any token carrying a valid mac is accepted until the
//! cookie expires; there is no server-side revocation.

mod password;
mod session;

pub use password::{hash_password, AdminCredential};
pub use session::{SessionAuthenticator, SessionCookie};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "admin_session";

/// Session lifetime in seconds (24 hours).
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("admin login is disabled: no admin password configured")]
    LoginDisabled,
    #[error("session secret must not be empty")]
    EmptySecret,
    #[error("SESSION_SECRET must be set in production")]
    MissingSecret,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Extract the session token from a `Cookie` request header.
pub fn session_token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
