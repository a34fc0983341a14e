//! Value objects shared across the pipeline.

pub mod classification;
pub mod config;
pub mod listing;
pub mod message;
pub mod query;
pub mod record;
pub mod report;
