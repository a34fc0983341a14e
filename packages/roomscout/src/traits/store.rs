//! Storage trait for the external listing service.
//!
//! The core reaches the persistence collaborator only through this
//! contract; it never manages the collaborator's schema.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::record::{ListingRecord, NewListing, SearchFilters};

/// The external listing-storage collaborator.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Search stored listings with the given filters.
    async fn search(&self, filters: &SearchFilters) -> StorageResult<Vec<ListingRecord>>;

    /// Create a listing; returns its id.
    ///
    /// The persister wraps this call in bounded retry; implementations
    /// should surface transport failures as [`StorageError::Transport`] and
    /// HTTP statuses as [`StorageError::Status`] so the retryable predicate
    /// can tell them apart.
    ///
    /// [`StorageError::Transport`]: crate::error::StorageError::Transport
    /// [`StorageError::Status`]: crate::error::StorageError::Status
    async fn create(&self, listing: &NewListing) -> StorageResult<String>;
}
