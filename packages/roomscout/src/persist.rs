//! Mapping extractions to storage records and persisting them with retry.
//!
//! Persistence never fails the pipeline: every attempt collapses into a
//! [`PersistOutcome`], success or not.

use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use regex::Regex;
use tracing::{info, warn};

use crate::error::StorageError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::traits::ListingStore;
use crate::types::listing::ExtractionOutcome;
use crate::types::record::{ListingAvailability, ListingLocation, NewListing};
use crate::types::report::PersistOutcome;

/// Source tag on every record this core creates.
const SOURCE: &str = "extracted_from_chat";

/// Max characters of original text carried into the record description.
const DESCRIPTION_LIMIT: usize = 200;

/// Known neighborhoods with walk/transit minutes to the campus reference
/// point: (alias, canonical, walk, transit).
const NEIGHBORHOODS: &[(&str, &str, u32, u32)] = &[
    ("mission hill", "Mission Hill", 10, 8),
    ("roxbury", "Roxbury", 15, 10),
    ("fenway", "Fenway", 15, 12),
    ("south end", "South End", 20, 12),
    ("back bay", "Back Bay", 25, 10),
    ("brookline", "Brookline", 35, 18),
    ("jamaica plain", "Jamaica Plain", 40, 20),
    ("dorchester", "Dorchester", 45, 25),
    ("allston", "Allston", 50, 25),
    ("cambridge", "Cambridge", 50, 25),
    ("brighton", "Brighton", 60, 30),
    ("somerville", "Somerville", 60, 30),
];

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// Amenity note labels and their storage slugs.
const AMENITY_SLUGS: &[(&str, &str)] = &[
    ("utilities included", "utilities_included"),
    ("furnished", "furnished"),
    ("parking available", "parking"),
    ("in-unit laundry", "laundry"),
    ("no broker fee", "no_broker_fee"),
    ("vegetarian preferred", "vegetarian_friendly"),
];

/// Maps extractions to [`NewListing`] records and creates them through the
/// storage collaborator, retrying transient failures.
pub struct ListingPersister {
    store: Arc<dyn ListingStore>,
    policy: RetryPolicy,
    city: String,
    digits: Regex,
    bedroom_pair: Regex,
    bedrooms: Regex,
    walk_minutes: Regex,
    month_day: Regex,
}

impl ListingPersister {
    pub fn new(store: Arc<dyn ListingStore>, policy: RetryPolicy, city: impl Into<String>) -> Self {
        Self {
            store,
            policy,
            city: city.into(),
            digits: Regex::new(r"([0-9]{1,3}(?:,[0-9]{3})*|[0-9]+)").unwrap(),
            // "2B2B" style bed/bath shorthand; bedroom count is the first digit.
            bedroom_pair: Regex::new(r"(?i)([0-9])\s*b\s*[0-9]\s*b").unwrap(),
            bedrooms: Regex::new(r"(?i)([0-9]+)\s*b(?:ed|hk|r)").unwrap(),
            walk_minutes: Regex::new(r"(?i)([0-9]+)\s*min(?:ute)?s?\s+walk").unwrap(),
            month_day: Regex::new(
                r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s*([0-9]{1,2})?",
            )
            .unwrap(),
        }
    }

    /// Persist one extraction. Collapses every failure into the outcome.
    pub async fn persist(&self, original_text: &str, outcome: &ExtractionOutcome) -> PersistOutcome {
        let listing = self.build_listing(original_text, outcome);

        let result = retry_with_backoff(
            self.policy,
            |err: &StorageError| err.is_retryable(),
            |_| {
                let listing = listing.clone();
                let store = Arc::clone(&self.store);
                async move { store.create(&listing).await }
            },
        )
        .await;

        match result {
            Ok(id) => {
                info!(listing_id = %id, "listing persisted");
                PersistOutcome::success(id)
            }
            Err(err) => {
                warn!(error = %err, "listing persistence failed");
                PersistOutcome::failure(err.to_string())
            }
        }
    }

    /// Derive the storage record from extracted fields plus the raw text.
    pub fn build_listing(&self, original_text: &str, outcome: &ExtractionOutcome) -> NewListing {
        let data = &outcome.data;

        let title = match &data.location {
            Some(location) => format!("Housing Listing - {location}"),
            None => "Housing Listing".to_string(),
        };

        let description: String = original_text.chars().take(DESCRIPTION_LIMIT).collect();

        let price = data.rent_price.as_deref().and_then(|p| self.parse_amount(p));

        let lowered_location = data.location.as_deref().unwrap_or("").to_lowercase();
        let known = NEIGHBORHOODS
            .iter()
            .find(|(alias, _, _, _)| lowered_location.contains(alias));

        let walk_minutes = self
            .walk_minutes
            .captures(original_text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .or(known.map(|(_, _, walk, _)| *walk));

        let room_type = data.room_type.clone().unwrap_or_else(|| "room".to_string());
        let lowered_room = room_type.to_lowercase();

        let property_type = if lowered_room.contains("studio") {
            "studio"
        } else if lowered_room.contains("house") {
            "house"
        } else {
            "apartment"
        }
        .to_string();

        let bedrooms = if lowered_room.contains("studio") {
            0
        } else {
            self.bedroom_pair
                .captures(&room_type)
                .or_else(|| self.bedrooms.captures(&room_type))
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(1)
        };

        let amenities = data
            .additional_notes
            .as_deref()
            .map(|notes| {
                AMENITY_SLUGS
                    .iter()
                    .filter(|(label, _)| notes.contains(label))
                    .map(|(_, slug)| (*slug).to_string())
                    .collect()
            })
            .unwrap_or_default();

        let gender_preference = match data.gender_preference.as_deref() {
            Some(pref) if pref.to_lowercase().contains("female") => "female",
            Some(pref) if pref.to_lowercase().contains("male") => "male",
            _ => "any",
        }
        .to_string();

        let start_date = data
            .availability_date
            .as_deref()
            .and_then(|text| self.parse_start_date(text))
            .unwrap_or_else(Utc::now);

        NewListing {
            title,
            description,
            price,
            location: ListingLocation {
                address: data.location.clone(),
                city: self.city.clone(),
                neighborhood: known.map(|(_, canonical, _, _)| (*canonical).to_string()),
                walk_minutes_to_campus: walk_minutes,
                transit_minutes_to_campus: known.map(|(_, _, _, transit)| *transit),
            },
            bedrooms,
            bathrooms: 1,
            property_type,
            room_type,
            amenities,
            gender_preference,
            contact_phone: data.contact_info.clone(),
            availability: ListingAvailability {
                start_date,
                is_available: true,
            },
            source: SOURCE.to_string(),
            extracted_data: data.clone(),
            confidence: outcome.confidence,
        }
    }

    fn parse_amount(&self, text: &str) -> Option<u32> {
        let caps = self.digits.captures(text)?;
        caps.get(1)?.as_str().replace(',', "").parse().ok()
    }

    /// Month-name date in availability text; the day defaults to the 1st,
    /// and months already past roll into next year.
    fn parse_start_date(&self, text: &str) -> Option<DateTime<Utc>> {
        let caps = self.month_day.captures(text)?;
        let prefix = caps.get(1)?.as_str().to_lowercase();
        let month = MONTHS
            .iter()
            .find(|(name, _)| name.starts_with(&prefix))
            .map(|(_, num)| *num)?;

        let day: u32 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .filter(|d| (1..=31).contains(d))
            .unwrap_or(1);

        let now = Utc::now();
        let year = if month < now.month() {
            now.year() + 1
        } else {
            now.year()
        };

        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
    }
}
