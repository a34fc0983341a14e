//! Search-result reply composition.
//!
//! Model-backed summary when a backend is configured, a deterministic
//! enumeration template otherwise. Either way, only real search results
//! appear in the reply text.

use std::sync::Arc;

use tracing::warn;

use crate::traits::AI;
use crate::types::query::{RangeType, SearchCriteria};
use crate::types::record::ListingRecord;

/// Composes reply text for executed searches.
pub struct SearchResponder {
    ai: Option<Arc<dyn AI>>,
    max_listings: usize,
}

impl SearchResponder {
    pub fn new(ai: Option<Arc<dyn AI>>, max_listings: usize) -> Self {
        Self { ai, max_listings }
    }

    /// Reply text plus whether the model backend produced it.
    pub async fn respond(
        &self,
        query: &str,
        criteria: &SearchCriteria,
        listings: &[ListingRecord],
    ) -> (String, bool) {
        if let Some(ai) = &self.ai {
            match ai.summarize_results(query, criteria, listings).await {
                Ok(text) => return (text, true),
                Err(err) => {
                    warn!(error = %err, "AI summary failed, using template");
                }
            }
        }

        (self.template(criteria, listings), false)
    }

    fn template(&self, criteria: &SearchCriteria, listings: &[ListingRecord]) -> String {
        if listings.is_empty() {
            return self.empty_template(criteria);
        }

        let mut lines = vec![format!(
            "Found {} listing{} for you:",
            listings.len(),
            if listings.len() == 1 { "" } else { "s" }
        )];

        for (i, listing) in listings.iter().take(self.max_listings).enumerate() {
            let price = listing
                .price
                .map(|p| format!("${p}/month"))
                .unwrap_or_else(|| "price on request".to_string());

            let mut line = format!("{}. {} - {}", i + 1, listing.title, price);
            if let Some(neighborhood) = &listing.neighborhood {
                line.push_str(&format!(", {neighborhood}"));
            }
            line.push_str(&format!(", {}", listing.property_type));
            if !listing.amenities.is_empty() {
                let shown: Vec<&str> =
                    listing.amenities.iter().take(2).map(String::as_str).collect();
                line.push_str(&format!(" ({})", shown.join(", ")));
            }
            lines.push(line);
        }

        if listings.len() > self.max_listings {
            lines.push(format!(
                "...and {} more. Want me to narrow it down?",
                listings.len() - self.max_listings
            ));
        }

        lines.join("\n")
    }

    /// Zero-result reply, with a suggestion keyed to the budget constraint.
    fn empty_template(&self, criteria: &SearchCriteria) -> String {
        let suggestion = match criteria.budget.range_type {
            Some(RangeType::Under | RangeType::Below) => {
                "Try raising your budget a little or widening the neighborhoods."
            }
            Some(RangeType::Around | RangeType::Exact) => {
                "Try widening the price range or dropping a filter."
            }
            Some(RangeType::Above | RangeType::Over) => {
                "Try lowering the minimum or widening the neighborhoods."
            }
            None => "Try adding a budget or a neighborhood so I can search better.",
        };

        format!("I couldn't find any listings matching that. {suggestion}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAI;
    use crate::types::query::BudgetFilter;

    fn record(id: &str, title: &str, price: u32) -> ListingRecord {
        ListingRecord {
            id: id.to_string(),
            title: title.to_string(),
            price: Some(price),
            neighborhood: Some("Mission Hill".to_string()),
            property_type: "apartment".to_string(),
            bedrooms: 2,
            amenities: vec!["furnished".to_string(), "parking".to_string()],
        }
    }

    #[tokio::test]
    async fn template_enumerates_up_to_the_cap() {
        let responder = SearchResponder::new(None, 3);
        let listings: Vec<ListingRecord> = (0..5)
            .map(|i| record(&i.to_string(), &format!("Listing {i}"), 800 + i * 100))
            .collect();

        let (text, ai_generated) = responder
            .respond("cheap rooms", &SearchCriteria::default(), &listings)
            .await;

        assert!(!ai_generated);
        assert!(text.starts_with("Found 5 listings"));
        assert!(text.contains("1. Listing 0 - $800/month"));
        assert!(text.contains("3. Listing 2"));
        assert!(!text.contains("4. Listing 3"));
        assert!(text.contains("and 2 more"));
    }

    #[tokio::test]
    async fn empty_results_suggest_by_range_type() {
        let responder = SearchResponder::new(None, 3);
        let criteria = SearchCriteria {
            budget: BudgetFilter {
                max: Some(500),
                range_type: Some(RangeType::Under),
                ..Default::default()
            },
            ..Default::default()
        };

        let (text, _) = responder.respond("under 500", &criteria, &[]).await;
        assert!(text.contains("couldn't find"));
        assert!(text.contains("raising your budget"));
    }

    #[tokio::test]
    async fn ai_summary_wins_when_configured() {
        let ai = Arc::new(MockAI::new().with_summary("Here are two great fits!"));
        let responder = SearchResponder::new(Some(ai), 3);

        let (text, ai_generated) = responder
            .respond(
                "rooms",
                &SearchCriteria::default(),
                &[record("1", "Listing", 900)],
            )
            .await;

        assert!(ai_generated);
        assert_eq!(text, "Here are two great fits!");
    }

    #[tokio::test]
    async fn ai_summary_failure_degrades_to_template() {
        let ai = Arc::new(MockAI::new().fail_summary());
        let responder = SearchResponder::new(Some(ai), 3);

        let (text, ai_generated) = responder
            .respond(
                "rooms",
                &SearchCriteria::default(),
                &[record("1", "Listing", 900)],
            )
            .await;

        assert!(!ai_generated);
        assert!(text.starts_with("Found 1 listing"));
    }
}
