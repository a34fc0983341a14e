//! Query intent routing.
//!
//! Mirrors the classification layer's shape: a model-backed router that
//! degrades internally, and a deterministic pattern router that treats every
//! query as a housing search.

pub mod respond;

pub use respond::SearchResponder;

use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::traits::AI;
use crate::types::query::{
    BudgetFilter, LocationFilter, QueryIntent, RangeType, RoomTypeFilter, RoutedQuery,
    SearchCriteria,
};

/// Neighborhood names the pattern router recognizes in queries.
const QUERY_NEIGHBORHOODS: &[&str] = &[
    "mission hill",
    "back bay",
    "fenway",
    "jamaica plain",
    "allston",
    "brighton",
    "roxbury",
    "south end",
    "beacon hill",
    "cambridge",
    "somerville",
    "brookline",
    "dorchester",
];

/// Phrases that express wanting to live close to campus.
const PROXIMITY_PHRASES: &[&str] = &[
    "near campus",
    "close to campus",
    "near neu",
    "near northeastern",
    "walking distance",
    "walk to campus",
];

/// Whole-word occurrence check: the phrase must not sit inside a larger
/// word on either side ("over" must not match "Dover").
fn has_phrase(lowered: &str, phrase: &str) -> bool {
    lowered.match_indices(phrase).any(|(start, _)| {
        let before_ok = lowered[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = lowered[start + phrase.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// Routes a free-text query into an intent plus criteria.
///
/// Never fails outward.
#[async_trait]
pub trait IntentRouter: Send + Sync {
    async fn route(&self, query: &str) -> RoutedQuery;
}

/// Deterministic pattern router.
///
/// Cannot distinguish intents, so every query routes to a housing search;
/// absent constraints simply stay unset.
pub struct RuleBasedIntentRouter {
    amount: Regex,
    bedrooms: Regex,
}

impl Default for RuleBasedIntentRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedIntentRouter {
    pub fn new() -> Self {
        Self {
            amount: Regex::new(r"\$?\s*([0-9]{3,5})\b").unwrap(),
            bedrooms: Regex::new(r"(?i)([0-9])\s*(?:br|bhk|bed(?:room)?s?)\b").unwrap(),
        }
    }

    fn decode_budget(&self, lowered: &str) -> BudgetFilter {
        let amount: Option<u32> = self
            .amount
            .captures(lowered)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());

        let Some(amount) = amount else {
            return BudgetFilter::default();
        };

        // Whole-word direction matching; any ceiling word beats "around"
        // so a locational "around Mission Hill" can't turn a ceiling query
        // into a target band. A bare amount reads as a ceiling.
        if has_phrase(lowered, "above") || has_phrase(lowered, "more than") {
            BudgetFilter {
                min: Some(amount),
                range_type: Some(RangeType::Above),
                ..Default::default()
            }
        } else if has_phrase(lowered, "over") {
            BudgetFilter {
                min: Some(amount),
                range_type: Some(RangeType::Over),
                ..Default::default()
            }
        } else if has_phrase(lowered, "below") || has_phrase(lowered, "less than") {
            BudgetFilter {
                max: Some(amount),
                range_type: Some(RangeType::Below),
                ..Default::default()
            }
        } else if has_phrase(lowered, "under") {
            BudgetFilter {
                max: Some(amount),
                range_type: Some(RangeType::Under),
                ..Default::default()
            }
        } else if has_phrase(lowered, "around")
            || has_phrase(lowered, "about")
            || has_phrase(lowered, "approximately")
        {
            BudgetFilter {
                target: Some(amount),
                range_type: Some(RangeType::Around),
                ..Default::default()
            }
        } else {
            BudgetFilter {
                max: Some(amount),
                range_type: Some(RangeType::Under),
                ..Default::default()
            }
        }
    }

    fn decode_criteria(&self, query: &str) -> SearchCriteria {
        let lowered = query.to_lowercase();

        let neighborhoods: Vec<String> = QUERY_NEIGHBORHOODS
            .iter()
            .filter(|n| lowered.contains(*n))
            .map(|n| (*n).to_string())
            .collect();

        let proximity = PROXIMITY_PHRASES
            .iter()
            .any(|p| lowered.contains(p))
            .then(|| "near campus".to_string());

        let mut property_types = Vec::new();
        for ptype in ["studio", "apartment", "house"] {
            if lowered.contains(ptype) {
                property_types.push(ptype.to_string());
            }
        }

        let bedroom_count = self
            .bedrooms
            .captures(&lowered)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());

        SearchCriteria {
            budget: self.decode_budget(&lowered),
            location: LocationFilter {
                neighborhoods,
                proximity,
                city: None,
            },
            room_type: RoomTypeFilter {
                property_types,
                bedroom_count,
                room_types: vec![],
            },
            ..Default::default()
        }
    }
}

#[async_trait]
impl IntentRouter for RuleBasedIntentRouter {
    async fn route(&self, query: &str) -> RoutedQuery {
        RoutedQuery {
            intent: QueryIntent::HousingSearch,
            criteria: Some(self.decode_criteria(query)),
            confidence: 0.7,
        }
    }
}

/// Model-backed router with pattern fallback.
pub struct AiIntentRouter {
    ai: Arc<dyn AI>,
    fallback: RuleBasedIntentRouter,
}

impl AiIntentRouter {
    pub fn new(ai: Arc<dyn AI>) -> Self {
        Self {
            ai,
            fallback: RuleBasedIntentRouter::new(),
        }
    }
}

#[async_trait]
impl IntentRouter for AiIntentRouter {
    async fn route(&self, query: &str) -> RoutedQuery {
        match self.ai.route_query(query).await {
            Ok(routed) => {
                debug!(intent = ?routed.intent, "AI routed query");
                routed
            }
            Err(err) => {
                warn!(error = %err, "AI routing failed, falling back to patterns");
                self.fallback.route(query).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAI;

    #[tokio::test]
    async fn below_amount_becomes_a_ceiling() {
        let router = RuleBasedIntentRouter::new();
        let routed = router.route("show me housing below 2000 dollars").await;

        assert_eq!(routed.intent, QueryIntent::HousingSearch);
        let criteria = routed.criteria.unwrap();
        assert_eq!(criteria.budget.max, Some(2000));
        assert_eq!(criteria.budget.range_type, Some(RangeType::Below));
    }

    #[tokio::test]
    async fn around_amount_becomes_a_target() {
        let router = RuleBasedIntentRouter::new();
        let routed = router.route("apartments around 1800").await;

        let criteria = routed.criteria.unwrap();
        assert_eq!(criteria.budget.target, Some(1800));
        assert_eq!(criteria.budget.range_type, Some(RangeType::Around));
        assert_eq!(criteria.room_type.property_types, vec!["apartment"]);
    }

    #[tokio::test]
    async fn ceiling_word_beats_a_locational_around() {
        let router = RuleBasedIntentRouter::new();
        let routed = router.route("apartments under 900 around mission hill").await;

        let criteria = routed.criteria.unwrap();
        assert_eq!(criteria.budget.max, Some(900));
        assert_eq!(criteria.budget.range_type, Some(RangeType::Under));
        assert_eq!(criteria.budget.target, None);
        assert_eq!(criteria.location.neighborhoods, vec!["mission hill"]);
    }

    #[tokio::test]
    async fn direction_words_match_whole_words_only() {
        let router = RuleBasedIntentRouter::new();
        let routed = router.route("rooms on Dover Street for 800").await;

        let budget = routed.criteria.unwrap().budget;
        assert_eq!(budget.min, None, "\"Dover\" must not read as \"over\"");
        assert_eq!(budget.max, Some(800));
        assert_eq!(budget.range_type, Some(RangeType::Under));
    }

    #[tokio::test]
    async fn bare_amount_reads_as_a_ceiling() {
        let router = RuleBasedIntentRouter::new();
        let routed = router.route("rooms for $900").await;

        let budget = routed.criteria.unwrap().budget;
        assert_eq!(budget.max, Some(900));
        assert_eq!(budget.range_type, Some(RangeType::Under));
    }

    #[tokio::test]
    async fn neighborhoods_and_proximity_are_picked_up() {
        let router = RuleBasedIntentRouter::new();
        let routed = router.route("2br in Mission Hill near campus").await;

        let criteria = routed.criteria.unwrap();
        assert_eq!(criteria.location.neighborhoods, vec!["mission hill"]);
        assert_eq!(criteria.location.proximity.as_deref(), Some("near campus"));
        assert_eq!(criteria.room_type.bedroom_count, Some(2));
    }

    #[tokio::test]
    async fn unconstrained_query_stays_unconstrained() {
        let router = RuleBasedIntentRouter::new();
        let routed = router.route("any place to live?").await;
        assert!(routed.criteria.unwrap().is_unconstrained());
    }

    #[tokio::test]
    async fn ai_routing_failure_degrades_to_patterns() {
        let ai = Arc::new(MockAI::new().fail_routing());
        let router = AiIntentRouter::new(ai);

        let routed = router.route("housing under 1500").await;
        assert_eq!(routed.intent, QueryIntent::HousingSearch);
        assert_eq!(routed.criteria.unwrap().budget.max, Some(1500));
    }

    #[tokio::test]
    async fn scripted_ai_route_is_used() {
        let scripted = RoutedQuery {
            intent: QueryIntent::Conversation,
            criteria: None,
            confidence: 0.95,
        };
        let ai = Arc::new(MockAI::new().with_route("hey there!", scripted));
        let router = AiIntentRouter::new(ai);

        let routed = router.route("hey there!").await;
        assert_eq!(routed.intent, QueryIntent::Conversation);
        assert!(routed.criteria.is_none());
    }
}
