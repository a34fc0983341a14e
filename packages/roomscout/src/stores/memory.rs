//! In-memory listing store.
//!
//! Backing store for tests and local runs; applies the same filter
//! semantics the real storage service does.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageResult;
use crate::traits::ListingStore;
use crate::types::record::{ListingRecord, NewListing, SearchFilters};

/// In-memory store keyed by generated UUIDs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    listings: RwLock<Vec<ListingRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a listing, for test setup.
    pub fn with_listing(self, listing: ListingRecord) -> Self {
        {
            let mut listings = self.listings.write().unwrap();
            listings.push(listing);
        }
        self
    }

    pub fn listing_count(&self) -> usize {
        self.listings.read().unwrap().len()
    }

    fn matches(listing: &ListingRecord, filters: &SearchFilters) -> bool {
        if let (Some(min), Some(price)) = (filters.min_price, listing.price) {
            if price < min {
                return false;
            }
        }
        if let (Some(max), Some(price)) = (filters.max_price, listing.price) {
            if price > max {
                return false;
            }
        }
        if !filters.neighborhoods.is_empty() {
            let hit = listing.neighborhood.as_deref().is_some_and(|n| {
                let lowered = n.to_lowercase();
                filters
                    .neighborhoods
                    .iter()
                    .any(|wanted| lowered.contains(&wanted.to_lowercase()))
            });
            if !hit {
                return false;
            }
        }
        if let Some(bedrooms) = filters.bedroom_count {
            if listing.bedrooms != bedrooms {
                return false;
            }
        }
        if let Some(ptype) = &filters.property_type {
            if !listing.property_type.eq_ignore_ascii_case(ptype) {
                return false;
            }
        }
        if !filters.amenities.is_empty() {
            let all = filters
                .amenities
                .iter()
                .all(|wanted| listing.amenities.iter().any(|a| a == wanted));
            if !all {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn search(&self, filters: &SearchFilters) -> StorageResult<Vec<ListingRecord>> {
        let listings = self.listings.read().unwrap();
        Ok(listings
            .iter()
            .filter(|l| Self::matches(l, filters))
            .cloned()
            .collect())
    }

    async fn create(&self, listing: &NewListing) -> StorageResult<String> {
        let id = Uuid::new_v4().to_string();
        let record = ListingRecord {
            id: id.clone(),
            title: listing.title.clone(),
            price: listing.price,
            neighborhood: listing.location.neighborhood.clone(),
            property_type: listing.property_type.clone(),
            bedrooms: listing.bedrooms,
            amenities: listing.amenities.clone(),
        };
        self.listings.write().unwrap().push(record);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: u32, neighborhood: &str, bedrooms: u8) -> ListingRecord {
        ListingRecord {
            id: Uuid::new_v4().to_string(),
            title: format!("Listing in {neighborhood}"),
            price: Some(price),
            neighborhood: Some(neighborhood.to_string()),
            property_type: "apartment".to_string(),
            bedrooms,
            amenities: vec!["furnished".to_string()],
        }
    }

    #[tokio::test]
    async fn price_band_filters_apply() {
        let store = MemoryStore::new()
            .with_listing(record(700, "Mission Hill", 2))
            .with_listing(record(1500, "Back Bay", 1))
            .with_listing(record(2500, "Back Bay", 3));

        let filters = SearchFilters {
            min_price: Some(1000),
            max_price: Some(2000),
            ..Default::default()
        };
        let results = store.search(&filters).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].price, Some(1500));
    }

    #[tokio::test]
    async fn neighborhood_matching_is_case_insensitive_substring() {
        let store = MemoryStore::new().with_listing(record(900, "Mission Hill", 2));

        let filters = SearchFilters {
            neighborhoods: vec!["mission hill".to_string()],
            ..Default::default()
        };
        assert_eq!(store.search(&filters).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_returns_a_fresh_id_and_stores_the_record() {
        let store = MemoryStore::new();
        let listing = NewListing {
            title: "Housing Listing".to_string(),
            description: String::new(),
            price: Some(575),
            location: Default::default(),
            bedrooms: 3,
            bathrooms: 1,
            property_type: "apartment".to_string(),
            room_type: "hall spot".to_string(),
            amenities: vec![],
            gender_preference: "any".to_string(),
            contact_phone: None,
            availability: crate::types::record::ListingAvailability {
                start_date: chrono::Utc::now(),
                is_available: true,
            },
            source: "extracted_from_chat".to_string(),
            extracted_data: Default::default(),
            confidence: 0.7,
        };

        let id = store.create(&listing).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(store.listing_count(), 1);
    }
}
