//! Structured results returned by the pipeline's public entry points.
//!
//! Every entry point returns one of these; none of them raises to its
//! caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::SecurityStatus;
use super::listing::{ExtractionOutcome, ValidationResult};
use super::query::SearchCriteria;
use super::record::ListingRecord;

/// Outcome of a persistence attempt.
///
/// Failure here is a non-fatal flag: the enclosing report is still a
/// success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistOutcome {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PersistOutcome {
    pub fn success(listing_id: impl Into<String>) -> Self {
        Self {
            success: true,
            listing_id: Some(listing_id.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            listing_id: None,
            error: Some(error.into()),
        }
    }
}

/// Complete result of processing one message through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReport {
    /// The parsed message body the pipeline operated on
    pub input_text: String,

    pub is_housing: bool,
    pub classification_reasoning: String,
    pub security_status: SecurityStatus,

    /// Present only when extraction ran (housing-relevant, secure input)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionOutcome>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence: Option<PersistOutcome>,

    /// Extraction confidence, 0.0 for non-housing messages
    pub confidence: f32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    pub processing_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate result of a batch run.
///
/// The aggregates are pure reductions over `results`; they hold regardless
/// of processing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<MessageReport>,
    pub total: usize,
    pub housing_count: usize,
    pub avg_confidence: f32,
    pub avg_processing_ms: f64,
}

impl BatchReport {
    pub fn from_results(results: Vec<MessageReport>) -> Self {
        let total = results.len();
        let housing_count = results.iter().filter(|r| r.is_housing).count();
        let (avg_confidence, avg_processing_ms) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                results.iter().map(|r| r.confidence).sum::<f32>() / total as f32,
                results.iter().map(|r| r.processing_ms as f64).sum::<f64>() / total as f64,
            )
        };

        Self {
            results,
            total,
            housing_count,
            avg_confidence,
            avg_processing_ms,
        }
    }
}

/// Terminal state of the chat-query state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Search executed; reply summarizes listings
    HousingSearch,

    /// Conversational or advice reply
    Conversation,

    /// Threat signature matched; fixed redirect
    RedirectBlocked,

    /// Query was not about housing; fixed redirect
    RedirectTopic,

    /// Something failed; fixed friendly recovery reply
    ErrorRecovery,
}

/// Reply to a chat-style query. Always friendly and on-topic, never a raw
/// error string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub kind: ReplyKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub listings: Vec<ListingRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<SearchCriteria>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,

    /// Whether the text came from the model backend
    pub ai_generated: bool,
}

impl ChatReply {
    pub fn blocked() -> Self {
        Self {
            text: "I only help with student housing questions, and that message looked like it \
                   was trying to change my instructions. What kind of place are you looking for?"
                .to_string(),
            kind: ReplyKind::RedirectBlocked,
            listings: vec![],
            criteria: None,
            suggestions: vec![
                "Find budget apartments".to_string(),
                "Get neighborhood info".to_string(),
            ],
            ai_generated: false,
        }
    }

    pub fn topic_redirect() -> Self {
        Self {
            text: "I'm best at housing questions! Ask me about apartments, neighborhoods, \
                   budgets, or roommates near campus."
                .to_string(),
            kind: ReplyKind::RedirectTopic,
            listings: vec![],
            criteria: None,
            suggestions: vec![
                "Find budget apartments".to_string(),
                "Get neighborhood info".to_string(),
                "Search by move-in date".to_string(),
            ],
            ai_generated: false,
        }
    }

    pub fn error_recovery() -> Self {
        Self {
            text: "Hey! I hit a technical snag, but I'm still here to help! What kind of \
                   housing are you looking for near campus?"
                .to_string(),
            kind: ReplyKind::ErrorRecovery,
            listings: vec![],
            criteria: None,
            suggestions: vec![
                "Find budget apartments".to_string(),
                "Get neighborhood info".to_string(),
                "Upload a chat export".to_string(),
            ],
            ai_generated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(is_housing: bool, confidence: f32, ms: u64) -> MessageReport {
        MessageReport {
            input_text: String::new(),
            is_housing,
            classification_reasoning: String::new(),
            security_status: SecurityStatus::Secure,
            extraction: None,
            validation: None,
            persistence: None,
            confidence,
            errors: vec![],
            processing_ms: ms,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn batch_aggregates_are_pure_reductions() {
        let results = vec![
            report(true, 0.9, 10),
            report(false, 0.0, 20),
            report(true, 0.7, 30),
        ];
        let batch = BatchReport::from_results(results);

        assert_eq!(batch.total, 3);
        assert_eq!(batch.housing_count, 2);
        assert!((batch.avg_confidence - (0.9 + 0.0 + 0.7) / 3.0).abs() < 1e-6);
        assert!((batch.avg_processing_ms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_batch_averages_zero() {
        let batch = BatchReport::from_results(vec![]);
        assert_eq!(batch.total, 0);
        assert_eq!(batch.avg_confidence, 0.0);
    }
}
