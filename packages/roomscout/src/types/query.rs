//! Query intents and structured search criteria.

use serde::{Deserialize, Serialize};

/// Intent of a free-text chat query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryIntent {
    /// Active search for a place to live
    HousingSearch,

    /// Informational question (neighborhoods, costs, logistics)
    GeneralQuestion,

    /// Greeting or chit-chat
    Conversation,

    /// Request for housing advice rather than listings
    HousingAdvice,
}

/// Comparison semantics attached to a budget figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeType {
    Above,
    Below,
    Around,
    Under,
    Over,
    Exact,
}

/// Budget constraint. Absent fields mean "unconstrained", never "zero".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_type: Option<RangeType>,
}

/// Location constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub neighborhoods: Vec<String>,

    /// Campus-proximity phrase ("near campus"), if the query expressed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Room/property-type constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_types: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedroom_count: Option<u8>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub room_types: Vec<String>,
}

/// Move-in timeline constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

/// Structured filter criteria decoded from a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub budget: BudgetFilter,

    #[serde(default)]
    pub location: LocationFilter,

    #[serde(default)]
    pub room_type: RoomTypeFilter,

    #[serde(default)]
    pub timeline: TimelineFilter,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

impl SearchCriteria {
    /// Whether no constraint at all was expressed.
    pub fn is_unconstrained(&self) -> bool {
        self.budget == BudgetFilter::default()
            && self.location == LocationFilter::default()
            && self.room_type == RoomTypeFilter::default()
            && self.timeline == TimelineFilter::default()
            && self.amenities.is_empty()
    }
}

/// A routed query: intent plus criteria (search intent only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedQuery {
    pub intent: QueryIntent,

    /// Present only for `HousingSearch`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<SearchCriteria>,

    pub confidence: f32,
}
