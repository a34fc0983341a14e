//! Completeness validation for extracted listings.
//!
//! Validation is advisory: it scores quality and flags gaps, it never stops
//! the pipeline or blocks persistence.

use crate::types::listing::{ExtractedListing, ValidationResult};

/// Penalty applied to the quality score per validation error.
const ERROR_PENALTY: f32 = 0.2;

/// Checks a housing-relevant extraction for essential fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessValidator;

impl CompletenessValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate an extraction.
    ///
    /// A housing-relevant record missing both price and location gets one
    /// error; non-housing records are vacuously valid.
    pub fn validate(&self, data: &ExtractedListing) -> ValidationResult {
        let mut errors = Vec::new();

        if data.is_housing_related && data.rent_price.is_none() && data.location.is_none() {
            errors.push("Missing essential housing information".to_string());
        }

        let quality_score = (1.0 - ERROR_PENALTY * errors.len() as f32).max(0.0);

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            quality_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record_is_valid_at_full_quality() {
        let data = ExtractedListing {
            rent_price: Some("$575/month".to_string()),
            location: Some("1 Cornelia Ct, Boston".to_string()),
            is_housing_related: true,
            ..Default::default()
        };

        let result = CompletenessValidator::new().validate(&data);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!((result.quality_score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_both_essentials_yields_exactly_one_error() {
        let data = ExtractedListing {
            is_housing_related: true,
            ..Default::default()
        };

        let result = CompletenessValidator::new().validate(&data);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Missing essential housing information"]);
        assert!((result.quality_score - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn one_essential_field_is_enough() {
        let price_only = ExtractedListing {
            rent_price: Some("$800/month".to_string()),
            is_housing_related: true,
            ..Default::default()
        };
        assert!(CompletenessValidator::new().validate(&price_only).is_valid);

        let location_only = ExtractedListing {
            location: Some("Fenway".to_string()),
            is_housing_related: true,
            ..Default::default()
        };
        assert!(CompletenessValidator::new().validate(&location_only).is_valid);
    }

    #[test]
    fn non_housing_records_are_vacuously_valid() {
        let result = CompletenessValidator::new().validate(&ExtractedListing::empty());
        assert!(result.is_valid);
        assert!((result.quality_score - 1.0).abs() < f32::EPSILON);
    }
}
