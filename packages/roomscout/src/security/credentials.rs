//! API-key handling.
//!
//! Keys live in `secrecy`'s zeroizing box and only leave it at the request
//! boundary. Both `Debug` and `Display` render a fixed placeholder, so a
//! stray `{:?}` in a log line can never leak a credential.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// An API key or similar credential that must never appear in logs.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(value.into().into_boxed_str()))
    }

    /// Borrow the raw value at the point of use (request headers only).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

// SecretBox itself is not Clone; re-wrap the exposed value.
impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Configuration for a model backend with secure credential handling.
#[derive(Clone, Debug)]
pub struct AiCredentials {
    /// API key (secret)
    pub api_key: SecretString,

    /// Model identifier
    pub model: String,

    /// API base URL (optional)
    pub base_url: Option<String>,
}

impl AiCredentials {
    /// Create new credentials.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            model: model.into(),
            base_url: None,
        }
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_secret() {
        let secret = SecretString::new("sk-very-secret");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
        assert_eq!(secret.expose(), "sk-very-secret");
    }
}
