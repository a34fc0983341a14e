//! Prompt-injection screening.
//!
//! Every classification and extraction call runs through the screen first;
//! flagged text is rejected before any model call happens.

use crate::types::classification::{SecurityStatus, ThreatAssessment};

/// Fixed ordered list of prompt-injection signatures.
///
/// Matching is case-insensitive substring search; every matching signature
/// is reported, not just the first.
pub const THREAT_SIGNATURES: &[&str] = &[
    "ignore previous instructions",
    "ignore all previous instructions",
    "you are now",
    "forget everything",
    "new instructions",
    "system prompt",
    "pretend you are",
    "disregard",
    "jailbreak",
];

/// Pattern-matcher for prompt-injection attempts.
///
/// Pure function of its input: no I/O, no state, same input always yields
/// the same assessment.
#[derive(Debug, Clone)]
pub struct ThreatScreen {
    signatures: Vec<&'static str>,
}

impl Default for ThreatScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreatScreen {
    /// Create a screen with the standard signature list.
    pub fn new() -> Self {
        Self {
            signatures: THREAT_SIGNATURES.to_vec(),
        }
    }

    /// Scan text against the signature list.
    pub fn scan(&self, text: &str) -> ThreatAssessment {
        let lowered = text.to_lowercase();
        let threats_found: Vec<String> = self
            .signatures
            .iter()
            .filter(|sig| lowered.contains(&sig.to_lowercase()))
            .map(|sig| (*sig).to_string())
            .collect();

        let status = if threats_found.is_empty() {
            SecurityStatus::Secure
        } else {
            SecurityStatus::Compromised
        };

        ThreatAssessment {
            threats_found,
            status,
        }
    }
}
