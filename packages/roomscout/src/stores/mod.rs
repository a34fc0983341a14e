//! Listing-store implementations.

mod http;
mod memory;

pub use http::HttpListingStore;
pub use memory::MemoryStore;
