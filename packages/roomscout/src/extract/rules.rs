//! Deterministic pattern-based extraction.
//!
//! Each field owns an ordered list of patterns; the first pattern that
//! matches wins and every field defaults to absent. The pattern lists are
//! data: extending a field means adding a regex, not touching control flow.
//!
//! This tier only runs after relevance was confirmed upstream, so its
//! output is always `is_housing_related: true`.

use async_trait::async_trait;
use regex::Regex;

use super::Extractor;
use crate::types::listing::{ExtractedListing, ExtractionOutcome};

/// Neighborhood names recognized in free text.
const NEIGHBORHOOD_NAMES: &str = "mission hill|back bay|fenway|jamaica plain|allston|brighton|\
roxbury|south end|north end|beacon hill|cambridge|somerville|brookline|dorchester|charlestown|\
east boston|seaport|medford|malden";

/// Rule-based field extractor.
///
/// Reproduces the same output shape as the model tier so downstream
/// validation and persistence never care which tier ran.
pub struct RuleBasedExtractor {
    price: Vec<Regex>,
    location: Vec<Regex>,
    room_type: Vec<Regex>,
    availability: Vec<Regex>,
    contact: Vec<Regex>,
    gender: Vec<(Regex, &'static str)>,
    amenities: Vec<(Regex, &'static str)>,
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

fn compile_labeled(patterns: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    patterns
        .iter()
        .map(|(p, label)| (Regex::new(p).unwrap(), *label))
        .collect()
}

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self {
            // Dollar amount with a monthly marker, or a "Rent:" label.
            price: compile(&[
                r"(?i)\$\s*([0-9]{1,3}(?:,[0-9]{3})*|[0-9]+)\s*(?:/\s*|per\s+)?(?:month|monthly|mo|pm)\b",
                r"(?i)\brent\s*:?\s*\$?\s*([0-9]{1,3}(?:,[0-9]{3})*|[0-9]+)\b",
            ]),
            // Pin-marker line, "Address:" label, street-address shape, or a
            // known neighborhood name.
            location: compile(&[
                r"📍\s*([^\n]+)",
                r"(?i)\baddress\s*:\s*([^\n]+)",
                r"([0-9]{1,5}(?:\s+[A-Z][A-Za-z]+)+\s+(?:Street|St|Avenue|Ave|Road|Rd|Court|Ct|Drive|Dr|Boulevard|Blvd|Lane|Ln|Place|Pl|Way|Terrace|Ter)\b\.?(?:\s*,\s*[A-Z][A-Za-z]+)?)",
                &format!(r"(?i)\b({NEIGHBORHOOD_NAMES})\b"),
            ]),
            // Hall/private/shared spot, bedroom-count shorthand, or
            // studio/apartment.
            room_type: compile(&[
                r"(?i)\b([0-9]+\s+(?:hall|private|shared)\s+(?:spot|room)s?(?:\s+in\s+a\s+[0-9]+\s*BHK)?)",
                r"(?i)\b([0-9]+\s*B\s*[0-9]+\s*B|[0-9]+\s*BHK|[0-9]+\s*BR|[0-9]+\s*bed(?:room)?s?)\b",
                r"(?i)\b(studio(?:\s+(?:apartment|apt))?|apartment|apt)\b",
            ]),
            // Availability label, long-form date, or bare month with day.
            availability: compile(&[
                r"(?i)\b((?:available|starting|move[\s-]?in)[:\s]+(?:now|immediately|asap|(?:from\s+)?[A-Za-z]+\s*[0-9]{1,2}(?:st|nd|rd|th)?))",
                r"(?i)\b((?:january|february|march|april|may|june|july|august|september|october|november|december)\s+[0-9]{1,2}(?:st|nd|rd|th)?(?:,?\s*[0-9]{4})?)",
                r"(?i)\b((?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)\.?\s+[0-9]{1,2})\b",
            ]),
            // International phone shape, or a contact label.
            contact: compile(&[
                r"((?:\+[0-9]{1,2}[\s.-]?)?\(?[0-9]{3}\)?[\s.-]?[0-9]{3}[\s.-]?[0-9]{4})",
                r"(?i)\b(?:dm|contact|call|text|whatsapp)\s*:?\s+([^\n.!]+)",
            ]),
            gender: compile_labeled(&[
                (
                    r"(?i)\b(?:all\s+girls|girls\s+only|females?\s+only|ladies\s+only|women\s+only)\b",
                    "Female only",
                ),
                (
                    r"(?i)\b(?:all\s+boys|boys\s+only|males?\s+only|men\s+only)\b",
                    "Male only",
                ),
                (r"(?i)\b(?:mixed\s+gender|co-?ed|any\s+gender)\b", "Mixed gender"),
            ]),
            amenities: compile_labeled(&[
                (
                    r"(?i)utilit(?:y|ies)\s+(?:included|incl|covered)|\+\s*utilit(?:y|ies)",
                    "utilities included",
                ),
                (r"(?i)\b(?:fully\s+)?furnished\b", "furnished"),
                (
                    r"(?i)\bveg(?:etarian)?s?\s+(?:only|preferred)\b|no\s+non[-\s]?veg",
                    "vegetarian preferred",
                ),
                (
                    r"(?i)no\s+broker(?:age)?(?:\s+fee)?|broker[-\s]?free",
                    "no broker fee",
                ),
                (r"(?i)\bparking\b", "parking available"),
                (r"(?i)\blaundry\b|washer|dryer", "in-unit laundry"),
            ]),
        }
    }

    /// Run every field's pattern list over the text.
    pub fn extract_fields(&self, text: &str) -> ExtractedListing {
        ExtractedListing {
            rent_price: self.extract_price(text),
            location: first_capture(&self.location, text),
            room_type: first_capture(&self.room_type, text),
            availability_date: first_capture(&self.availability, text),
            contact_info: first_capture(&self.contact, text),
            gender_preference: first_label(&self.gender, text),
            additional_notes: self.extract_notes(text),
            is_housing_related: true,
        }
    }

    fn extract_price(&self, text: &str) -> Option<String> {
        first_capture(&self.price, text).map(|amount| format!("${amount}/month"))
    }

    /// Up to three amenity labels, comma-joined.
    fn extract_notes(&self, text: &str) -> Option<String> {
        let found: Vec<&str> = self
            .amenities
            .iter()
            .filter(|(re, _)| re.is_match(text))
            .map(|(_, label)| *label)
            .take(3)
            .collect();

        if found.is_empty() {
            None
        } else {
            Some(found.join(", "))
        }
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().trim().trim_end_matches(['.', ',']).to_string())
        })
    })
}

fn first_label(patterns: &[(Regex, &'static str)], text: &str) -> Option<String> {
    patterns
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, label)| (*label).to_string())
}

#[async_trait]
impl Extractor for RuleBasedExtractor {
    async fn extract(&self, text: &str) -> ExtractionOutcome {
        if text.trim().is_empty() {
            return ExtractionOutcome::error();
        }
        ExtractionOutcome::rule_based(self.extract_fields(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORNELIA: &str = "🏠 *Permanent Accommodation Available!* 1 hall spot in a 3BHK, \
$575/month + utilities. 1 Cornelia Ct, Boston. 12 mins walk to NEU. DM +1 857-891-9600.";

    #[test]
    fn cornelia_message_extracts_all_core_fields() {
        let extractor = RuleBasedExtractor::new();
        let fields = extractor.extract_fields(CORNELIA);

        assert_eq!(fields.rent_price.as_deref(), Some("$575/month"));
        assert!(fields.location.as_deref().unwrap().contains("1 Cornelia Ct"));
        assert!(fields.room_type.as_deref().unwrap().contains("hall spot"));
        assert!(fields.contact_info.as_deref().unwrap().contains("857-891-9600"));
        assert!(fields.is_housing_related);
    }

    #[test]
    fn price_requires_a_monthly_marker_or_rent_label() {
        let extractor = RuleBasedExtractor::new();
        assert_eq!(
            extractor.extract_price("asking $1,200/month"),
            Some("$1,200/month".to_string())
        );
        assert_eq!(
            extractor.extract_price("Rent: 800 for the big room"),
            Some("$800/month".to_string())
        );
        assert_eq!(extractor.extract_price("I spent $40 on dinner"), None);
    }

    #[test]
    fn location_falls_back_through_the_pattern_list() {
        let extractor = RuleBasedExtractor::new();

        let pin = extractor.extract_fields("great room 📍 74 Hillside St");
        assert_eq!(pin.location.as_deref(), Some("74 Hillside St"));

        let label = extractor.extract_fields("Address: 12 Ward St, Boston");
        assert_eq!(label.location.as_deref(), Some("12 Ward St, Boston"));

        let neighborhood = extractor.extract_fields("room open in mission hill right now");
        assert_eq!(neighborhood.location.as_deref(), Some("mission hill"));
    }

    #[test]
    fn room_type_patterns_cover_shorthands() {
        let extractor = RuleBasedExtractor::new();
        assert_eq!(
            extractor.extract_fields("spacious 2B2B near campus").room_type.as_deref(),
            Some("2B2B")
        );
        assert_eq!(
            extractor.extract_fields("looking to fill a 3BHK").room_type.as_deref(),
            Some("3BHK")
        );
        assert_eq!(
            extractor.extract_fields("cozy studio apartment open").room_type.as_deref(),
            Some("studio apartment")
        );
    }

    #[test]
    fn availability_patterns() {
        let extractor = RuleBasedExtractor::new();
        assert_eq!(
            extractor
                .extract_fields("1BR, available September 1st, call me")
                .availability_date
                .as_deref(),
            Some("available September 1st")
        );
        assert_eq!(
            extractor
                .extract_fields("lease starts January 15, 2026")
                .availability_date
                .as_deref(),
            Some("January 15, 2026")
        );
    }

    #[test]
    fn contact_matches_phone_shapes() {
        let extractor = RuleBasedExtractor::new();
        assert_eq!(
            extractor.extract_fields("call 617-555-0123 today").contact_info.as_deref(),
            Some("617-555-0123")
        );
        assert_eq!(
            extractor.extract_fields("DM: roomfinder_boston for info").contact_info.as_deref(),
            Some("roomfinder_boston for info")
        );
    }

    #[test]
    fn gender_phrase_sets_normalize() {
        let extractor = RuleBasedExtractor::new();
        assert_eq!(
            extractor.extract_fields("all girls flat").gender_preference.as_deref(),
            Some("Female only")
        );
        assert_eq!(
            extractor.extract_fields("male only please").gender_preference.as_deref(),
            Some("Male only")
        );
        assert_eq!(
            extractor.extract_fields("we are a mixed gender flat").gender_preference.as_deref(),
            Some("Mixed gender")
        );
        assert_eq!(extractor.extract_fields("nice flat").gender_preference, None);
    }

    #[test]
    fn notes_collect_up_to_three_amenities() {
        let extractor = RuleBasedExtractor::new();
        let fields = extractor
            .extract_fields("fully furnished, utilities included, parking, in-building laundry");
        let notes = fields.additional_notes.unwrap();
        let parts: Vec<&str> = notes.split(", ").collect();
        assert_eq!(parts.len(), 3);
        assert!(notes.contains("furnished"));
        assert!(notes.contains("utilities included"));
    }

    #[test]
    fn unmatched_fields_stay_absent() {
        let extractor = RuleBasedExtractor::new();
        let fields = extractor.extract_fields("room chat");
        assert_eq!(fields.rent_price, None);
        assert_eq!(fields.location, None);
        assert_eq!(fields.availability_date, None);
        assert_eq!(fields.contact_info, None);
        assert_eq!(fields.gender_preference, None);
        assert_eq!(fields.additional_notes, None);
        assert!(fields.is_housing_related);
    }
}
