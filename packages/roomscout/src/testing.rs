//! Hand-rolled test doubles with call tracking.
//!
//! Shared by unit tests and integration tests; compiled into the library so
//! downstream crates can script pipeline behavior in their own tests.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AiError, AiResult, StorageError, StorageResult};
use crate::traits::{ListingStore, AI};
use crate::types::listing::ExtractedListing;
use crate::types::query::{QueryIntent, RoutedQuery, SearchCriteria};
use crate::types::record::{ListingRecord, NewListing, SearchFilters};

/// One recorded call against [`MockAI`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAiCall {
    Classify(String),
    Extract(String),
    Route(String),
    Summarize(String),
    Converse(String),
}

/// Scriptable AI double.
///
/// Unscripted inputs get plausible defaults; `fail_*` flags turn a method
/// into a hard backend failure. Every call is recorded.
#[derive(Debug, Default)]
pub struct MockAI {
    verdicts: HashMap<String, String>,
    extractions: HashMap<String, ExtractedListing>,
    routes: HashMap<String, RoutedQuery>,
    summary: Option<String>,
    fail_classification: bool,
    fail_extraction: bool,
    fail_routing: bool,
    fail_summary: bool,
    calls: Mutex<Vec<MockAiCall>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the classification verdict for an exact input.
    pub fn with_verdict(mut self, text: impl Into<String>, verdict: impl Into<String>) -> Self {
        self.verdicts.insert(text.into(), verdict.into());
        self
    }

    /// Script the extraction for an exact input.
    pub fn with_extraction(mut self, text: impl Into<String>, listing: ExtractedListing) -> Self {
        self.extractions.insert(text.into(), listing);
        self
    }

    /// Script the routed query for an exact input.
    pub fn with_route(mut self, query: impl Into<String>, routed: RoutedQuery) -> Self {
        self.routes.insert(query.into(), routed);
        self
    }

    /// Fixed summary text for every summarize call.
    pub fn with_summary(mut self, text: impl Into<String>) -> Self {
        self.summary = Some(text.into());
        self
    }

    pub fn fail_classification(mut self) -> Self {
        self.fail_classification = true;
        self
    }

    pub fn fail_extraction(mut self) -> Self {
        self.fail_extraction = true;
        self
    }

    pub fn fail_routing(mut self) -> Self {
        self.fail_routing = true;
        self
    }

    pub fn fail_summary(mut self) -> Self {
        self.fail_summary = true;
        self
    }

    pub fn calls(&self) -> Vec<MockAiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MockAiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn backend_down() -> AiError {
        AiError::Request(Box::new(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "mock backend down",
        )))
    }
}

#[async_trait]
impl AI for MockAI {
    async fn classify_housing(&self, text: &str) -> AiResult<String> {
        self.record(MockAiCall::Classify(text.to_string()));
        if self.fail_classification {
            return Err(Self::backend_down());
        }
        if let Some(verdict) = self.verdicts.get(text) {
            return Ok(verdict.clone());
        }

        let lowered = text.to_lowercase();
        if lowered.contains('$') || lowered.contains("rent") {
            Ok("HOUSING".to_string())
        } else {
            Ok("NOT_HOUSING".to_string())
        }
    }

    async fn extract_listing(&self, text: &str) -> AiResult<ExtractedListing> {
        self.record(MockAiCall::Extract(text.to_string()));
        if self.fail_extraction {
            return Err(Self::backend_down());
        }
        Ok(self.extractions.get(text).cloned().unwrap_or(ExtractedListing {
            is_housing_related: true,
            ..Default::default()
        }))
    }

    async fn route_query(&self, query: &str) -> AiResult<RoutedQuery> {
        self.record(MockAiCall::Route(query.to_string()));
        if self.fail_routing {
            return Err(Self::backend_down());
        }
        Ok(self.routes.get(query).cloned().unwrap_or(RoutedQuery {
            intent: QueryIntent::HousingSearch,
            criteria: Some(SearchCriteria::default()),
            confidence: 0.9,
        }))
    }

    async fn summarize_results(
        &self,
        query: &str,
        _criteria: &SearchCriteria,
        listings: &[ListingRecord],
    ) -> AiResult<String> {
        self.record(MockAiCall::Summarize(query.to_string()));
        if self.fail_summary {
            return Err(Self::backend_down());
        }
        Ok(self
            .summary
            .clone()
            .unwrap_or_else(|| format!("Found {} listings matching your search.", listings.len())))
    }

    async fn converse(&self, query: &str) -> AiResult<String> {
        self.record(MockAiCall::Converse(query.to_string()));
        Ok("Happy to chat about housing!".to_string())
    }
}

/// Scriptable listing-store double with failure injection.
#[derive(Debug, Default)]
pub struct MockStore {
    search_results: Vec<ListingRecord>,
    created: Mutex<Vec<NewListing>>,
    create_calls: AtomicU32,
    transient_failures: AtomicU32,
    fail_status: Option<u16>,
    fail_search: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed result set for every search.
    pub fn with_search_results(mut self, listings: Vec<ListingRecord>) -> Self {
        self.search_results = listings;
        self
    }

    /// Fail the first `n` create calls with a transport error.
    pub fn fail_times(self, n: u32) -> Self {
        self.transient_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Fail every create call with the given HTTP status.
    pub fn fail_status(mut self, code: u16) -> Self {
        self.fail_status = Some(code);
        self
    }

    /// Fail every search with a transport error.
    pub fn fail_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Listings successfully created so far.
    pub fn records(&self) -> Vec<NewListing> {
        self.created.lock().unwrap().clone()
    }

    fn transport_error() -> StorageError {
        StorageError::Transport(Box::new(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "mock store unreachable",
        )))
    }
}

#[async_trait]
impl ListingStore for MockStore {
    async fn search(&self, _filters: &SearchFilters) -> StorageResult<Vec<ListingRecord>> {
        if self.fail_search {
            return Err(Self::transport_error());
        }
        Ok(self.search_results.clone())
    }

    async fn create(&self, listing: &NewListing) -> StorageResult<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(code) = self.fail_status {
            return Err(StorageError::Status { code });
        }

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Self::transport_error());
        }

        self.created.lock().unwrap().push(listing.clone());
        Ok(Uuid::new_v4().to_string())
    }
}
