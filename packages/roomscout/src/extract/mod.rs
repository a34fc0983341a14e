//! Two-tier field extraction.
//!
//! The model-backed tier is tried first; any decode failure or a decoded
//! object missing either essential field (price, location) falls through to
//! the deterministic rule-based tier. Both tiers produce the same outcome
//! shape so downstream validation and persistence are tier-agnostic.

mod rules;

pub use rules::RuleBasedExtractor;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::traits::AI;
use crate::types::listing::ExtractionOutcome;

/// Extracts structured listing fields from a housing-relevant message.
///
/// Only runs after relevance has been confirmed upstream; never fails
/// outward.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, text: &str) -> ExtractionOutcome;
}

/// Model-backed extractor with rule-based fallback.
pub struct AiExtractor {
    ai: Arc<dyn AI>,
    fallback: RuleBasedExtractor,
}

impl AiExtractor {
    pub fn new(ai: Arc<dyn AI>) -> Self {
        Self {
            ai,
            fallback: RuleBasedExtractor::new(),
        }
    }
}

#[async_trait]
impl Extractor for AiExtractor {
    async fn extract(&self, text: &str) -> ExtractionOutcome {
        if text.trim().is_empty() {
            return ExtractionOutcome::error();
        }

        match self.ai.extract_listing(text).await {
            // The AI tier must deliver both essentials to count as a
            // success; anything less is a tier failure, not a hard error.
            Ok(data) if data.has_essentials() => {
                debug!("AI extraction succeeded");
                ExtractionOutcome::ai(data)
            }
            Ok(_) => {
                warn!("AI extraction missing essential fields, falling back to rules");
                self.fallback.extract(text).await
            }
            Err(err) => {
                warn!(error = %err, "AI extraction failed, falling back to rules");
                self.fallback.extract(text).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAI;
    use crate::types::listing::{ExtractedListing, ExtractionMethod};

    const LISTING: &str =
        "Studio apartment in Back Bay, $1500/month, available September 1st. Contact 617-555-0123";

    #[tokio::test]
    async fn scripted_ai_extraction_wins_at_high_confidence() {
        let scripted = ExtractedListing {
            rent_price: Some("$1500/month".to_string()),
            location: Some("Back Bay".to_string()),
            is_housing_related: true,
            ..Default::default()
        };
        let ai = Arc::new(MockAI::new().with_extraction(LISTING, scripted.clone()));
        let extractor = AiExtractor::new(ai);

        let outcome = extractor.extract(LISTING).await;
        assert_eq!(outcome.method, ExtractionMethod::AiExtraction);
        assert!((outcome.confidence - 0.9).abs() < f32::EPSILON);
        assert_eq!(outcome.data, scripted);
    }

    #[tokio::test]
    async fn missing_essentials_from_ai_triggers_rule_fallback() {
        // Decoded fine, but no location: tier failure by contract.
        let partial = ExtractedListing {
            rent_price: Some("$1500/month".to_string()),
            is_housing_related: true,
            ..Default::default()
        };
        let ai = Arc::new(MockAI::new().with_extraction(LISTING, partial));
        let extractor = AiExtractor::new(ai);

        let outcome = extractor.extract(LISTING).await;
        assert_eq!(outcome.method, ExtractionMethod::RuleBased);
        assert!((outcome.confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(outcome.data.rent_price.as_deref(), Some("$1500/month"));
        assert!(outcome.data.location.is_some());
    }

    #[tokio::test]
    async fn ai_error_triggers_rule_fallback() {
        let ai = Arc::new(MockAI::new().fail_extraction());
        let extractor = AiExtractor::new(ai);

        let outcome = extractor.extract(LISTING).await;
        assert_eq!(outcome.method, ExtractionMethod::RuleBased);
        assert!(outcome.data.is_housing_related);
    }

    #[tokio::test]
    async fn empty_text_fails_both_tiers() {
        let ai = Arc::new(MockAI::new().fail_extraction());
        let extractor = AiExtractor::new(ai);

        let outcome = extractor.extract("   ").await;
        assert_eq!(outcome.method, ExtractionMethod::Error);
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.data, ExtractedListing::empty());
    }
}
