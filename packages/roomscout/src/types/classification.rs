//! Threat assessments and relevance classification results.

use serde::{Deserialize, Serialize};

/// Security verdict attached to every classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityStatus {
    /// No threat signatures matched
    Secure,

    /// At least one prompt-injection signature matched
    Compromised,

    /// Classification itself failed; treated as not-housing
    Error,
}

/// Result of screening a message against the threat signature list.
///
/// Created per classification call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatAssessment {
    /// Every signature that matched, in signature-list order
    pub threats_found: Vec<String>,

    /// `Compromised` iff any signature matched
    pub status: SecurityStatus,
}

impl ThreatAssessment {
    pub fn is_compromised(&self) -> bool {
        self.status == SecurityStatus::Compromised
    }
}

/// Which strategy produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Model-backed verdict
    Ai,

    /// Keyword-set fallback
    Keyword,

    /// Security short-circuit or classification failure
    Error,
}

/// Whether a message is about housing, and how we decided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// `false` whenever `security_status` is not `Secure`, regardless of content
    pub is_housing: bool,

    /// Human-readable explanation of the decision
    pub reasoning: String,

    /// Strategy that produced the verdict
    pub method: ClassificationMethod,

    /// Security verdict for the screened text
    pub security_status: SecurityStatus,
}

impl ClassificationResult {
    /// Security short-circuit: extraction must never run on flagged text.
    pub fn blocked(threats: &[String]) -> Self {
        Self {
            is_housing: false,
            reasoning: format!(
                "Security threat detected - message rejected ({})",
                threats.join(", ")
            ),
            method: ClassificationMethod::Error,
            security_status: SecurityStatus::Compromised,
        }
    }
}
