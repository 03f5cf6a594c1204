use std::fmt;

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use super::{AuthError, SESSION_COOKIE, SESSION_MAX_AGE_SECS};
use crate::config;

type HmacSha256 = Hmac<Sha256>;

const PAYLOAD_BYTES: usize = 32;

/// A `Set-Cookie` value for the admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub value: String,
    pub max_age: u64,
    pub secure: bool,
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.value, self.max_age
        )?;
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

/// Mints and verifies signed session tokens.
#[derive(Clone)]
pub struct SessionAuthenticator {
    mac: HmacSha256,
    secure: bool,
}

impl SessionAuthenticator {
    /// `secure` marks issued cookies `Secure` (production).
    pub fn new(secret: &[u8], secure: bool) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| AuthError::EmptySecret)?;
        Ok(Self { mac, secure })
    }

    /// Build from SESSION_SECRET and BAKEHOUSE_ENV.
    ///
    /// Outside production a missing secret falls back to a development secret
    /// with a warning. In production it is an error.
    pub fn from_env() -> Result<Self, AuthError> {
        let secure = config::is_production();
        let secret = match config::get_session_secret() {
            Some(secret) => secret,
            None if secure => return Err(AuthError::MissingSecret),
            None => {
                tracing::warn!("SESSION_SECRET is not set; using the development secret");
                config::DEV_SESSION_SECRET.to_string()
            }
        };
        Self::new(secret.as_bytes(), secure)
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Issue a fresh session.
    pub fn create_session(&self) -> SessionCookie {
        let mut bytes = [0u8; PAYLOAD_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let payload = hex::encode(bytes);
        let signature = self.sign(&payload);

        SessionCookie {
            value: format!("{}.{}", payload, signature),
            max_age: SESSION_MAX_AGE_SECS,
            secure: self.secure,
        }
    }

    /// A cookie that clears the session in the browser.
    pub fn destroy_session(&self) -> SessionCookie {
        SessionCookie {
            value: String::new(),
            max_age: 0,
            secure: self.secure,
        }
    }

    /// Check a token's signature in constant time.
    pub fn verify(&self, token: &str) -> bool {
        let mut parts = token.split('.');
        let (Some(payload), Some(signature), None) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        if payload.is_empty() || !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return false;
        }
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    pub fn ensure_authenticated(&self, token: Option<&str>) -> Result<(), AuthError> {
        match token {
            Some(token) if self.verify(token) => Ok(()),
            _ => Err(AuthError::Unauthorized),
        }
    }
}
