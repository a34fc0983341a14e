//! Lightweight pipeline counters.
//!
//! Atomic counters shared across the pipeline's entry points; cheap enough
//! to record on every message.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for pipeline activity.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    requests: AtomicU64,
    errors: AtomicU64,
    housing_detected: AtomicU64,
    listings_persisted: AtomicU64,
    threats_blocked: AtomicU64,
    fallback_extractions: AtomicU64,
    chat_queries: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub errors: u64,
    pub housing_detected: u64,
    pub listings_persisted: u64,
    pub threats_blocked: u64,
    pub fallback_extractions: u64,
    pub chat_queries: u64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_housing_detected(&self) {
        self.housing_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_listing_persisted(&self) {
        self.listings_persisted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_threat_blocked(&self) {
        self.threats_blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_extraction(&self) {
        self.fallback_extractions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_chat_query(&self) {
        self.chat_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            housing_detected: self.housing_detected.load(Ordering::Relaxed),
            listings_persisted: self.listings_persisted.load(Ordering::Relaxed),
            threats_blocked: self.threats_blocked.load(Ordering::Relaxed),
            fallback_extractions: self.fallback_extractions.load(Ordering::Relaxed),
            chat_queries: self.chat_queries.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = PipelineMetrics::new();
        metrics.record_request();
        metrics.record_request();
        metrics.record_housing_detected();
        metrics.record_threat_blocked();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests, 2);
        assert_eq!(snapshot.housing_detected, 1);
        assert_eq!(snapshot.threats_blocked, 1);
        assert_eq!(snapshot.errors, 0);
    }
}
