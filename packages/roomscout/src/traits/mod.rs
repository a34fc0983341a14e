//! Core trait abstractions (AI backend, listing store).

pub mod ai;
pub mod store;

pub use ai::AI;
pub use store::ListingStore;
