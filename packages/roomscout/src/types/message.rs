//! Parsed chat-export messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message after export-metadata stripping.
///
/// `body` is the best-effort reconstruction of the human-authored content.
/// It is never empty when `original` is non-empty: when no export structure
/// is recognized the original text is carried through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// The raw input, untouched
    pub original: String,

    /// The human-authored message content
    pub body: String,

    /// When parsing happened
    pub parsed_at: DateTime<Utc>,
}

impl ParsedMessage {
    /// Create a parsed message stamped with the current time.
    pub fn new(original: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            body: body.into(),
            parsed_at: Utc::now(),
        }
    }

    /// Carry the raw input through unchanged.
    pub fn verbatim(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            body: original.clone(),
            original,
            parsed_at: Utc::now(),
        }
    }
}
