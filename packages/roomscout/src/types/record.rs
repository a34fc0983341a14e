//! Wire shapes for the external listing-storage collaborator.
//!
//! These mirror the storage service's request/response contract. The core
//! creates `NewListing` records and reads back `ListingRecord`s; it never
//! manages the collaborator's schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::listing::ExtractedListing;
use super::query::{RangeType, SearchCriteria};

/// Location block of a stored listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    pub city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,

    /// Estimated walk minutes to the campus reference point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_minutes_to_campus: Option<u32>,

    /// Estimated transit minutes to the campus reference point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_minutes_to_campus: Option<u32>,
}

/// Availability block of a stored listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingAvailability {
    pub start_date: DateTime<Utc>,
    pub is_available: bool,
}

/// A listing record to be created in the external storage service.
///
/// Owned and mutated only by the persister's mapping step; its lifecycle
/// ends at the boundary of the create call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,

    /// Numeric monthly price, when one could be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,

    pub location: ListingLocation,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub property_type: String,
    pub room_type: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,

    /// "female" | "male" | "any"
    pub gender_preference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,

    pub availability: ListingAvailability,

    /// Always "extracted_from_chat" for records created by this core
    pub source: String,

    /// The raw extraction the record was derived from
    pub extracted_data: ExtractedListing,

    pub confidence: f32,
}

/// A listing as returned by the storage collaborator's search operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,

    pub property_type: String,
    pub bedrooms: u8,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

/// Filters passed through to the storage collaborator's search operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub neighborhoods: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedroom_count: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

impl SearchFilters {
    /// Map decoded criteria onto the storage contract.
    ///
    /// A `target` budget ("around $1800") becomes a ±20% band; explicit
    /// min/max pass through unchanged.
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        let budget = &criteria.budget;
        let (mut min_price, mut max_price) = (budget.min, budget.max);

        if let Some(target) = budget.target {
            if matches!(budget.range_type, Some(RangeType::Around) | None) {
                min_price = min_price.or(Some(target - target / 5));
                max_price = max_price.or(Some(target + target / 5));
            }
        }

        Self {
            min_price,
            max_price,
            neighborhoods: criteria.location.neighborhoods.clone(),
            bedroom_count: criteria.room_type.bedroom_count,
            property_type: criteria.room_type.property_types.first().cloned(),
            amenities: criteria.amenities.clone(),
        }
    }
}
