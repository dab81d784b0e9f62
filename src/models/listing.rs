// src/models/listing.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A travel destination, stored in the `places` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub place_id: String,
    pub slug: String,
    pub name: String,
    pub location: String,
    #[sqlx(json)]
    pub images: Vec<String>,
    #[sqlx(json)]
    pub categories: Vec<String>,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    pub rating: f64,
    pub reviews: i64,
    pub avg_sentiment_score: Option<i32>,
    pub active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw list query string. Values stay strings until the service parses them.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub categories: Option<String>,
    pub rating: Option<String>,
    pub sentiment_score: Option<String>,
    pub sort: Option<String>,
    pub active: Option<String>,
    pub featured: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub data: Vec<Listing>,
    pub next_page: Option<i64>,
    pub has_more: bool,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewListingRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub lon: f64,
    pub is_featured: Option<bool>,
    pub active: Option<bool>,
}

/// A fully resolved row ready for insertion.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub place_id: String,
    pub slug: String,
    pub name: String,
    pub location: String,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    pub active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Nullable aggregates as the store reports them.
#[derive(Debug, Default, Clone, PartialEq, FromRow)]
pub struct ListingCounts {
    pub total: Option<i64>,
    pub active: Option<i64>,
    pub featured: Option<i64>,
    pub recent: Option<i64>,
    pub this_month: Option<i64>,
    pub last_month: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub featured: i64,
    pub recent: i64,
    pub this_month: i64,
    pub last_month: i64,
    pub monthly_change: i64,
}
