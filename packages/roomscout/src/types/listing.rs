//! Extracted listing fields, extraction outcomes, and validation results.

use serde::{Deserialize, Serialize};

/// Structured fields extracted from a housing-relevant message.
///
/// All fields are optional strings; absence means "not extracted", never an
/// empty string. When the classifier says a message is not housing-related
/// the fields must all be absent (never fabricated).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedListing {
    /// Monthly rent amount (e.g. "$575/month")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_price: Option<String>,

    /// Address or neighborhood
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Type of accommodation (e.g. "1 hall spot", "Studio apartment")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,

    /// Move-in date or availability text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_date: Option<String>,

    /// Contact information (phone number or handle)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,

    /// Gender restrictions, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_preference: Option<String>,

    /// Additional details (amenities, utilities, broker notes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,

    /// Whether the message is housing-related
    #[serde(default)]
    pub is_housing_related: bool,
}

impl ExtractedListing {
    /// All-null record for non-housing messages and hard failures.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether both essential fields (price and location) are present.
    ///
    /// The AI tier requires this to count as a success; the rule tier does
    /// not (a rule-based record missing both only trips the validator).
    pub fn has_essentials(&self) -> bool {
        self.rent_price.is_some() && self.location.is_some()
    }
}

/// Which tier produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Model-backed few-shot extraction
    AiExtraction,

    /// Deterministic pattern-based fallback
    RuleBased,

    /// Both tiers failed outright
    Error,
}

/// An extraction plus its provenance and confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub data: ExtractedListing,

    /// Confidence in [0, 1]: 0.9 for the AI tier, 0.7 for the rule tier
    pub confidence: f32,

    pub method: ExtractionMethod,
}

impl ExtractionOutcome {
    pub fn ai(data: ExtractedListing) -> Self {
        Self {
            data,
            confidence: 0.9,
            method: ExtractionMethod::AiExtraction,
        }
    }

    pub fn rule_based(data: ExtractedListing) -> Self {
        Self {
            data,
            confidence: 0.7,
            method: ExtractionMethod::RuleBased,
        }
    }

    /// Both tiers failed: empty record at zero confidence.
    pub fn error() -> Self {
        Self {
            data: ExtractedListing::empty(),
            confidence: 0.0,
            method: ExtractionMethod::Error,
        }
    }
}

/// Result of completeness validation.
///
/// Validation failures are soft: they flag quality, they never stop the
/// pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `false` iff any validation error was recorded
    pub is_valid: bool,

    pub errors: Vec<String>,

    /// `1.0 - 0.2 × error count`, floored at 0
    pub quality_score: f32,
}
