//! Relevance classification: is this message about housing?
//!
//! Two strategies share one result shape: a model-backed classifier and a
//! keyword-set fallback. Which one a pipeline uses is decided once at
//! construction time, by AI availability; the model-backed strategy
//! degrades to keywords internally when the backend fails.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::security::ThreatScreen;
use crate::traits::AI;
use crate::types::classification::{
    ClassificationMethod, ClassificationResult, SecurityStatus,
};

/// Curated housing/neighborhood/logistics terms for the fallback tier.
///
/// Case-insensitive substring match, OR-combined.
const HOUSING_KEYWORDS: &[&str] = &[
    "rent",
    "lease",
    "sublet",
    "sublease",
    "apartment",
    "apt",
    "studio",
    "bedroom",
    "roommate",
    "housing",
    "accommodation",
    "room available",
    "room for",
    "move-in",
    "move in",
    "utilities",
    "furnished",
    "landlord",
    "deposit",
    "tenant",
    "listing",
    "bhk",
    "mission hill",
    "back bay",
    "fenway",
    "jamaica plain",
    "allston",
    "brighton",
    "roxbury",
    "commute",
    "walk to campus",
];

/// Classifies whether a message concerns housing.
///
/// Never fails outward: every input yields a [`ClassificationResult`].
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> ClassificationResult;
}

/// Deterministic keyword-set classifier.
///
/// Pure apart from the threat screen it shares with the AI strategy: the
/// same input always yields the same output.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    screen: ThreatScreen,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            screen: ThreatScreen::new(),
        }
    }

    fn keyword_verdict(text: &str) -> (bool, String) {
        let lowered = text.to_lowercase();
        match HOUSING_KEYWORDS.iter().find(|kw| lowered.contains(*kw)) {
            Some(kw) => (true, format!("Matched housing keyword \"{kw}\"")),
            None => (false, "No housing keywords matched".to_string()),
        }
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> ClassificationResult {
        let assessment = self.screen.scan(text);
        if assessment.is_compromised() {
            return ClassificationResult::blocked(&assessment.threats_found);
        }

        let (is_housing, reasoning) = Self::keyword_verdict(text);
        ClassificationResult {
            is_housing,
            reasoning,
            method: ClassificationMethod::Keyword,
            security_status: SecurityStatus::Secure,
        }
    }
}

/// Model-backed classifier with internal keyword fallback.
///
/// The threat screen runs before any model call; flagged text is rejected
/// without ever reaching the backend.
pub struct AiClassifier {
    ai: Arc<dyn AI>,
    screen: ThreatScreen,
}

impl AiClassifier {
    pub fn new(ai: Arc<dyn AI>) -> Self {
        Self {
            ai,
            screen: ThreatScreen::new(),
        }
    }
}

/// Decode the single-token verdict from model text.
///
/// Case-insensitive substring match; `NOT_HOUSING` takes precedence so a
/// `HOUSING` substring inside it can't produce a false positive.
fn decode_verdict(text: &str) -> Option<bool> {
    let upper = text.to_uppercase();
    if upper.contains("NOT_HOUSING") {
        Some(false)
    } else if upper.contains("HOUSING") {
        Some(true)
    } else {
        None
    }
}

#[async_trait]
impl Classifier for AiClassifier {
    async fn classify(&self, text: &str) -> ClassificationResult {
        let assessment = self.screen.scan(text);
        if assessment.is_compromised() {
            return ClassificationResult::blocked(&assessment.threats_found);
        }

        match self.ai.classify_housing(text).await {
            Ok(response) => match decode_verdict(&response) {
                Some(is_housing) => {
                    debug!(is_housing, "AI classification verdict");
                    ClassificationResult {
                        is_housing,
                        reasoning: response,
                        method: ClassificationMethod::Ai,
                        security_status: SecurityStatus::Secure,
                    }
                }
                None => {
                    warn!("AI verdict undecodable, falling back to keywords");
                    let (is_housing, reasoning) = KeywordClassifier::keyword_verdict(text);
                    ClassificationResult {
                        is_housing,
                        reasoning: format!("{reasoning} (AI verdict undecodable)"),
                        method: ClassificationMethod::Keyword,
                        security_status: SecurityStatus::Secure,
                    }
                }
            },
            Err(err) => {
                warn!(error = %err, "AI classification failed, falling back to keywords");
                let (is_housing, reasoning) = KeywordClassifier::keyword_verdict(text);
                ClassificationResult {
                    is_housing,
                    reasoning: format!("{reasoning} (AI unavailable: {err})"),
                    method: ClassificationMethod::Keyword,
                    security_status: SecurityStatus::Secure,
                }
            }
        }
    }
}
