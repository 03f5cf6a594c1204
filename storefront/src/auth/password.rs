use sha2::{Digest, Sha256};

use super::AuthError;
use crate::config;

/// How the admin password is checked.
#[derive(Clone)]
pub enum AdminCredential {
    /// bcrypt hash from ADMIN_PASSWORD_HASH.
    Hashed(String),
    /// Plain text from ADMIN_PASSWORD. Development only.
    PlainText(String),
    /// Nothing configured; every login fails.
    Disabled,
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

impl AdminCredential {
    /// The bcrypt hash wins over the plain-text password.
    pub fn from_env() -> Self {
        if let Some(hash) = config::get_admin_password_hash() {
            return Self::Hashed(hash);
        }
        if let Some(password) = config::get_admin_password() {
            tracing::warn!(
                "Using plain-text ADMIN_PASSWORD; set ADMIN_PASSWORD_HASH for production"
            );
            return Self::PlainText(password);
        }
        tracing::warn!("No admin password configured; admin login is disabled");
        Self::Disabled
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hashed(_) => "bcrypt",
            Self::PlainText(_) => "plain-text",
            Self::Disabled => "disabled",
        }
    }

    /// Check a login attempt. bcrypt runs on the blocking pool.
    pub async fn verify(&self, password: &str) -> Result<(), AuthError> {
        match self {
            Self::Disabled => {
                tracing::error!("Admin login attempted but no admin password is configured");
                Err(AuthError::LoginDisabled)
            }
            Self::PlainText(expected) => {
                if Sha256::digest(expected.as_bytes()) == Sha256::digest(password.as_bytes()) {
                    Ok(())
                } else {
                    Err(AuthError::Unauthorized)
                }
            }
            Self::Hashed(hash) => {
                let hash = hash.clone();
                let password = password.to_owned();
                match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
                    Ok(Ok(true)) => Ok(()),
                    Ok(Ok(false)) => Err(AuthError::Unauthorized),
                    Ok(Err(e)) => {
                        tracing::error!("Stored admin password hash is unusable: {}", e);
                        Err(AuthError::Unauthorized)
                    }
                    Err(e) => {
                        tracing::error!("Password check task failed: {}", e);
                        Err(AuthError::Unauthorized)
                    }
                }
            }
        }
    }
}

/// Hash a password for ADMIN_PASSWORD_HASH.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}
