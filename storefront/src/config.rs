//! Environment configuration for the storefront.
//!
//! Connection strings are read with the following precedence:
//! 1. NETLIFY_DATABASE_URL_UNPOOLED
//! 2. NETLIFY_DATABASE_URL
//! 3. DATABASE_URL
//!
//! Admin credentials come from ADMIN_PASSWORD_HASH (bcrypt) or, as a
//! development fallback, ADMIN_PASSWORD. SESSION_SECRET keys the session MAC.

use crate::persistence::ConnectionCandidate;

/// Connection string variables in precedence order.
pub const CONNECTION_ENV_VARS: [&str; 3] = [
    "NETLIFY_DATABASE_URL_UNPOOLED",
    "NETLIFY_DATABASE_URL",
    "DATABASE_URL",
];

pub const ADMIN_PASSWORD_HASH_VAR: &str = "ADMIN_PASSWORD_HASH";
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";
pub const SESSION_SECRET_VAR: &str = "SESSION_SECRET";
pub const ENVIRONMENT_VAR: &str = "BAKEHOUSE_ENV";

/// Secret used when SESSION_SECRET is unset outside production.
pub const DEV_SESSION_SECRET: &str = "bakehouse-dev-session-secret-change-me";

/// Read a variable, treating blank values as unset.
fn get_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Get the configured connection strings in precedence order.
///
/// Every variable that is set becomes a candidate; the provider picks the
/// first non-blank one.
pub fn connection_candidates() -> Vec<ConnectionCandidate> {
    CONNECTION_ENV_VARS
        .iter()
        .filter_map(|&source| get_var(source).map(|url| ConnectionCandidate { source, url }))
        .collect()
}

/// True when BAKEHOUSE_ENV is `production` (case-insensitive).
pub fn is_production() -> bool {
    get_var(ENVIRONMENT_VAR).is_some_and(|env| env.trim().eq_ignore_ascii_case("production"))
}

/// Get the session secret, if one is configured.
pub fn get_session_secret() -> Option<String> {
    get_var(SESSION_SECRET_VAR)
}

pub fn get_admin_password_hash() -> Option<String> {
    get_var(ADMIN_PASSWORD_HASH_VAR)
}

pub fn get_admin_password() -> Option<String> {
    get_var(ADMIN_PASSWORD_VAR)
}

/// Which known variables are set, without their values.
pub fn env_presence() -> Vec<(&'static str, bool)> {
    CONNECTION_ENV_VARS
        .iter()
        .copied()
        .chain([
            ADMIN_PASSWORD_HASH_VAR,
            ADMIN_PASSWORD_VAR,
            SESSION_SECRET_VAR,
            ENVIRONMENT_VAR,
        ])
        .map(|name| (name, get_var(name).is_some()))
        .collect()
}
