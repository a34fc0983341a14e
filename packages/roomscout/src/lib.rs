//! RoomScout: student-housing chat intake and structured extraction.
//!
//! Takes raw chat-export text (WhatsApp-style group dumps), screens it for
//! prompt-injection signatures, classifies housing relevance, extracts
//! structured listing fields through a two-tier strategy (model-backed with
//! a deterministic rule fallback), validates completeness, and persists
//! listings to an external store with bounded retry. A second entry point
//! answers chat-style housing queries by routing intent and searching
//! stored listings.
//!
//! The pipeline's public entry points never raise: every failure mode
//! collapses into the returned report or reply.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use roomscout::pipeline::Pipeline;
//! use roomscout::stores::MemoryStore;
//!
//! # async fn run() {
//! let pipeline = Pipeline::new(Arc::new(MemoryStore::new()));
//! let report = pipeline
//!     .process_message("8/7/24, 7:46 PM - Dana: Studio in Fenway, $1400/month")
//!     .await;
//! assert!(report.is_housing);
//! # }
//! ```

pub mod classify;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod parser;
pub mod persist;
pub mod pipeline;
pub mod prompts;
pub mod query;
pub mod retry;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validate;

#[cfg(feature = "openai")]
pub mod ai;

pub use error::{AiError, PipelineError, Result, StorageError};
pub use pipeline::Pipeline;
pub use traits::{ListingStore, AI};
pub use types::config::PipelineConfig;
pub use types::report::{BatchReport, ChatReply, MessageReport};
