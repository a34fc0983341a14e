//! The message-processing pipeline.
//!
//! Wires the stages together: parse, threat screen + classification,
//! two-tier extraction, validation, persistence with retry. Also hosts the
//! chat-query state machine. Strategy selection (model-backed vs
//! deterministic) happens once, at construction time.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::classify::{AiClassifier, Classifier, KeywordClassifier};
use crate::extract::{AiExtractor, Extractor, RuleBasedExtractor};
use crate::metrics::{MetricsSnapshot, PipelineMetrics};
use crate::parser::ChatLogParser;
use crate::persist::ListingPersister;
use crate::query::{AiIntentRouter, IntentRouter, RuleBasedIntentRouter, SearchResponder};
use crate::traits::{ListingStore, AI};
use crate::types::classification::SecurityStatus;
use crate::types::config::PipelineConfig;
use crate::types::listing::ExtractionMethod;
use crate::types::query::QueryIntent;
use crate::types::record::SearchFilters;
use crate::types::report::{BatchReport, ChatReply, MessageReport, ReplyKind};
use crate::validate::CompletenessValidator;

/// The housing-intake pipeline.
///
/// Entry points never raise: every outcome, including total failure of a
/// stage, collapses into the returned report or reply.
pub struct Pipeline {
    parser: ChatLogParser,
    classifier: Arc<dyn Classifier>,
    extractor: Arc<dyn Extractor>,
    validator: CompletenessValidator,
    persister: ListingPersister,
    router: Arc<dyn IntentRouter>,
    responder: SearchResponder,
    store: Arc<dyn ListingStore>,
    ai: Option<Arc<dyn AI>>,
    metrics: Arc<PipelineMetrics>,
}

impl Pipeline {
    /// Fully deterministic pipeline: keyword classification, rule-based
    /// extraction and routing, template replies.
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self::build(store, None, PipelineConfig::default())
    }

    /// Model-backed pipeline. Every model-backed stage still degrades to
    /// its deterministic tier internally on backend failure.
    pub fn with_ai(store: Arc<dyn ListingStore>, ai: Arc<dyn AI>) -> Self {
        Self::build(store, Some(ai), PipelineConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn ListingStore>,
        ai: Option<Arc<dyn AI>>,
        config: PipelineConfig,
    ) -> Self {
        Self::build(store, ai, config)
    }

    fn build(
        store: Arc<dyn ListingStore>,
        ai: Option<Arc<dyn AI>>,
        config: PipelineConfig,
    ) -> Self {
        let (classifier, extractor, router): (
            Arc<dyn Classifier>,
            Arc<dyn Extractor>,
            Arc<dyn IntentRouter>,
        ) = match &ai {
            Some(ai) => (
                Arc::new(AiClassifier::new(Arc::clone(ai))),
                Arc::new(AiExtractor::new(Arc::clone(ai))),
                Arc::new(AiIntentRouter::new(Arc::clone(ai))),
            ),
            None => (
                Arc::new(KeywordClassifier::new()),
                Arc::new(RuleBasedExtractor::new()),
                Arc::new(RuleBasedIntentRouter::new()),
            ),
        };

        Self {
            parser: ChatLogParser::new(),
            classifier,
            extractor,
            validator: CompletenessValidator::new(),
            persister: ListingPersister::new(Arc::clone(&store), config.retry, config.city.clone()),
            router,
            responder: SearchResponder::new(ai.clone(), config.max_reply_listings),
            store,
            ai,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Process one raw export block end to end.
    #[instrument(skip_all)]
    pub async fn process_message(&self, raw: &str) -> MessageReport {
        let started = Instant::now();
        self.metrics.record_request();

        let parsed = self.parser.parse(raw);
        let classification = self.classifier.classify(&parsed.body).await;

        let mut errors = Vec::new();
        let mut extraction = None;
        let mut validation = None;
        let mut persistence = None;

        match classification.security_status {
            SecurityStatus::Compromised => {
                self.metrics.record_threat_blocked();
                warn!("threat signature matched, message blocked");
            }
            SecurityStatus::Secure | SecurityStatus::Error => {
                if classification.is_housing {
                    self.metrics.record_housing_detected();

                    let outcome = self.extractor.extract(&parsed.body).await;
                    match outcome.method {
                        ExtractionMethod::RuleBased => self.metrics.record_fallback_extraction(),
                        ExtractionMethod::Error => {
                            self.metrics.record_error();
                            errors.push("extraction failed in both tiers".to_string());
                        }
                        ExtractionMethod::AiExtraction => {}
                    }

                    let checked = self.validator.validate(&outcome.data);
                    errors.extend(checked.errors.iter().cloned());

                    if outcome.data.is_housing_related {
                        let persisted = self.persister.persist(&parsed.body, &outcome).await;
                        if persisted.success {
                            self.metrics.record_listing_persisted();
                        } else {
                            self.metrics.record_error();
                            if let Some(err) = &persisted.error {
                                errors.push(format!("persistence failed: {err}"));
                            }
                        }
                        persistence = Some(persisted);
                    }

                    validation = Some(checked);
                    extraction = Some(outcome);
                }
            }
        }

        let confidence = extraction.as_ref().map_or(0.0, |e| e.confidence);
        info!(
            is_housing = classification.is_housing,
            confidence, "message processed"
        );

        MessageReport {
            input_text: parsed.body,
            is_housing: classification.is_housing,
            classification_reasoning: classification.reasoning,
            security_status: classification.security_status,
            extraction,
            validation,
            persistence,
            confidence,
            errors,
            processing_ms: started.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        }
    }

    /// Process a batch of export blocks sequentially and aggregate.
    pub async fn process_batch<S: AsRef<str>>(&self, messages: &[S]) -> BatchReport {
        let mut results = Vec::with_capacity(messages.len());
        for message in messages {
            results.push(self.process_message(message.as_ref()).await);
        }
        BatchReport::from_results(results)
    }

    /// Answer a chat-style query.
    ///
    /// State machine: threat screen, relevance gate, intent routing, then
    /// either a search with composed reply or a conversational reply.
    #[instrument(skip_all)]
    pub async fn handle_chat(&self, query: &str) -> ChatReply {
        self.metrics.record_chat_query();

        let classification = self.classifier.classify(query).await;
        if classification.security_status == SecurityStatus::Compromised {
            self.metrics.record_threat_blocked();
            return ChatReply::blocked();
        }
        if !classification.is_housing {
            return ChatReply::topic_redirect();
        }

        let routed = self.router.route(query).await;
        match routed.intent {
            QueryIntent::HousingSearch => {
                let criteria = routed.criteria.unwrap_or_default();
                let filters = SearchFilters::from_criteria(&criteria);

                match self.store.search(&filters).await {
                    Ok(listings) => {
                        let (text, ai_generated) =
                            self.responder.respond(query, &criteria, &listings).await;
                        ChatReply {
                            text,
                            kind: ReplyKind::HousingSearch,
                            listings,
                            criteria: Some(criteria),
                            suggestions: vec![],
                            ai_generated,
                        }
                    }
                    Err(err) => {
                        self.metrics.record_error();
                        warn!(error = %err, "listing search failed");
                        ChatReply::error_recovery()
                    }
                }
            }
            QueryIntent::GeneralQuestion
            | QueryIntent::Conversation
            | QueryIntent::HousingAdvice => self.converse(query).await,
        }
    }

    async fn converse(&self, query: &str) -> ChatReply {
        if let Some(ai) = &self.ai {
            match ai.converse(query).await {
                Ok(text) => {
                    return ChatReply {
                        text,
                        kind: ReplyKind::Conversation,
                        listings: vec![],
                        criteria: None,
                        suggestions: vec![],
                        ai_generated: true,
                    }
                }
                Err(err) => {
                    warn!(error = %err, "conversational reply failed, using fixed text");
                }
            }
        }

        ChatReply {
            text: "Happy to help with anything housing-related! Ask me about apartments, \
                   neighborhoods, budgets, or roommates near campus."
                .to_string(),
            kind: ReplyKind::Conversation,
            listings: vec![],
            criteria: None,
            suggestions: vec![
                "Find budget apartments".to_string(),
                "Get neighborhood info".to_string(),
            ],
            ai_generated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    #[tokio::test]
    async fn non_housing_message_skips_extraction() {
        let pipeline = Pipeline::new(Arc::new(MemoryStore::new()));
        let report = pipeline.process_message("anyone up for a movie tonight?").await;

        assert!(!report.is_housing);
        assert!(report.extraction.is_none());
        assert!(report.persistence.is_none());
        assert_eq!(report.confidence, 0.0);
    }

    #[tokio::test]
    async fn metrics_track_a_processed_batch() {
        let pipeline = Pipeline::new(Arc::new(MemoryStore::new()));
        let messages = [
            "Room for rent in Mission Hill, $800/month".to_string(),
            "great weather today".to_string(),
        ];
        pipeline.process_batch(&messages).await;

        let snapshot = pipeline.metrics();
        assert_eq!(snapshot.requests, 2);
        assert_eq!(snapshot.housing_detected, 1);
        assert_eq!(snapshot.listings_persisted, 1);
    }
}
