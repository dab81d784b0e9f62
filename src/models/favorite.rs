// src/models/favorite.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Favorite {
    pub user_id: String,
    pub place_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFavoriteRequest {
    #[serde(default)]
    pub place_id: String,
}

/// The listing columns shown on a saved-places card.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    pub slug: String,
    pub location: String,
    #[sqlx(json)]
    pub images: Vec<String>,
    #[sqlx(json)]
    pub categories: Vec<String>,
    pub rating: f64,
    pub reviews: i64,
    pub avg_sentiment_score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedPlace {
    pub place_id: String,
    pub places: PlaceSummary,
}
