//! Threat screening and credential handling.

pub mod credentials;
pub mod threats;

pub use credentials::{AiCredentials, SecretString};
pub use threats::ThreatScreen;
