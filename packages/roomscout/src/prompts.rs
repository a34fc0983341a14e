//! LLM prompts for classification, extraction, query routing, and search
//! responses.
//!
//! The prompts encode decision contracts, not wording guarantees: the
//! classifier decodes a single-token verdict, the extractor and router
//! require strict JSON.

/// Prompt for the housing relevance verdict.
///
/// The model must answer with the single token `HOUSING` or `NOT_HOUSING`.
pub const CLASSIFICATION_PROMPT: &str = r#"You are a classifier for a student housing assistant.

A message or question is HOUSING if it concerns any part of the housing ecosystem:
- Finding, offering, or subletting rooms and apartments
- Neighborhoods and where to live (safety, vibe, convenience)
- Financial aspects of living (rent, deposits, utilities, budgeting for housing)
- Commute and transportation between home and campus
- Roommates and shared living dynamics
- Move-in logistics (leases, furniture, utilities setup)

A message is NOT_HOUSING if it is about anything else: coursework, food plans,
social events, jobs, or general chit-chat with no link to choosing or
maintaining housing.

Tie-break: would the answer help a student decide where or how to live?
If yes, it is HOUSING.

Message: "{input_text}"

Answer with exactly one token, HOUSING or NOT_HOUSING.

Classification: "#;

/// Few-shot prompt for structured listing extraction.
///
/// The response must be a single JSON object in the `ExtractedListing`
/// shape; a non-housing message yields all-null fields and
/// `is_housing_related: false`.
pub const EXTRACTION_PROMPT: &str = r#"Extract housing information from chat messages into JSON. Examples:

Example 1:
Message: "Studio apt available Back Bay area $2200/month utilities included available now call Mike 857-123-4567"
Output: {"rent_price": "$2200/month", "location": "Back Bay area", "room_type": "Studio apartment", "availability_date": "available now", "contact_info": "Mike 857-123-4567", "gender_preference": null, "additional_notes": "utilities included", "is_housing_related": true}

Example 2:
Message: "🏠 1 hall spot in a 3BHK, $575/month + utilities.
1 Cornelia Ct, Boston.
DM +1 857-891-9600. All girls apartment."
Output: {"rent_price": "$575/month", "location": "1 Cornelia Ct, Boston", "room_type": "1 hall spot in a 3BHK", "availability_date": null, "contact_info": "+1 857-891-9600", "gender_preference": "Female only", "additional_notes": "utilities included", "is_housing_related": true}

Example 3:
Message: "Hey what's everyone doing tonight?"
Output: {"rent_price": null, "location": null, "room_type": null, "availability_date": null, "contact_info": null, "gender_preference": null, "additional_notes": null, "is_housing_related": false}

Now extract from this message. Reply with the JSON object only.
Message: "{input_text}"

Output: "#;

/// Prompt for routing a free-text query to an intent, with criteria for
/// search intents.
pub const QUERY_ROUTING_PROMPT: &str = r#"You route queries for a student housing assistant. Examples:

Query: "hello there"
Output: {"intent": "CONVERSATION", "confidence": 0.95}

Query: "how much should I budget for my first apartment?"
Output: {"intent": "HOUSING_ADVICE", "confidence": 0.9}

Query: "tell me about Mission Hill"
Output: {"intent": "GENERAL_QUESTION", "confidence": 0.9}

Query: "show me housing below 2000 dollars in Fenway near campus"
Output: {"intent": "HOUSING_SEARCH", "confidence": 0.95, "criteria": {"budget": {"max": 2000, "range_type": "below"}, "location": {"neighborhoods": ["Fenway"], "proximity": "near campus"}}}

Query: "find furnished 2BR apartments around 1800"
Output: {"intent": "HOUSING_SEARCH", "confidence": 0.9, "criteria": {"budget": {"target": 1800, "range_type": "around"}, "room_type": {"property_types": ["apartment"], "bedroom_count": 2}, "amenities": ["furnished"]}}

Range types: above | below | around | under | over | exact.
Include "criteria" only for HOUSING_SEARCH. Reply with the JSON object only.

Query: "{query}"

Output: "#;

/// Prompt for summarizing search results in the context of the stated
/// criteria.
///
/// Contract: use only the listing data given; never invent listings.
pub const SEARCH_RESPONSE_PROMPT: &str = r#"You are a friendly student housing assistant.

The user asked: "{query}"
Decoded criteria: {criteria}
Matching listings (use ONLY these, never invent others): {listings}

If there are listings, summarize them conversationally with their prices and
neighborhoods. If there are none, say so and suggest a concrete adjustment
(budget, neighborhood, or a roommate search) that fits the criteria.
Keep it under 120 words."#;

/// Fill the `{input_text}` slot of a prompt template.
pub fn format_message_prompt(template: &str, input_text: &str) -> String {
    template.replace("{input_text}", input_text)
}

/// Fill the `{query}` slot of a prompt template.
pub fn format_query_prompt(template: &str, query: &str) -> String {
    template.replace("{query}", query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_slot_is_filled() {
        let filled = format_message_prompt(CLASSIFICATION_PROMPT, "room for rent");
        assert!(filled.contains("\"room for rent\""));
        assert!(!filled.contains("{input_text}"));
    }

    #[test]
    fn query_slot_is_filled() {
        let filled = format_query_prompt(QUERY_ROUTING_PROMPT, "housing under 1500");
        assert!(filled.contains("\"housing under 1500\""));
        assert!(!filled.contains("{query}"));
    }
}
