//! AI trait for model-backend operations.
//!
//! Implementations wrap a specific LLM provider and handle prompting and
//! response decoding. Every method may fail with a generic [`AiError`]
//! (timeout, rate limit, malformed response); callers must tolerate any
//! such failure by degrading to their deterministic tier.

use async_trait::async_trait;

use crate::error::AiResult;
use crate::types::listing::ExtractedListing;
use crate::types::query::{RoutedQuery, SearchCriteria};
use crate::types::record::ListingRecord;

/// Model backend for classification, extraction, routing, and replies.
#[async_trait]
pub trait AI: Send + Sync {
    /// Housing relevance verdict for a message.
    ///
    /// Returns the raw model text; the classifier decodes the
    /// `HOUSING`/`NOT_HOUSING` token from it.
    async fn classify_housing(&self, text: &str) -> AiResult<String>;

    /// Few-shot structured listing extraction with strict JSON decoding.
    ///
    /// A decode failure is an error here; the extractor treats it as a tier
    /// failure, not a hard stop.
    async fn extract_listing(&self, text: &str) -> AiResult<ExtractedListing>;

    /// Route a free-text query into an intent plus (for searches)
    /// structured filter criteria.
    async fn route_query(&self, query: &str) -> AiResult<RoutedQuery>;

    /// Summarize search results in the context of the stated criteria.
    ///
    /// Must use only the listings given, never invent others.
    async fn summarize_results(
        &self,
        query: &str,
        criteria: &SearchCriteria,
        listings: &[ListingRecord],
    ) -> AiResult<String>;

    /// Conversational reply for non-search intents.
    async fn converse(&self, query: &str) -> AiResult<String>;
}
