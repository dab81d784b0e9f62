use chrono::{DateTime, TimeZone, Utc};

use crate::models::listing::Listing;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

/// An active, unrated listing with no categories.
pub fn listing(id: &str) -> Listing {
    Listing {
        place_id: id.to_string(),
        slug: id.to_string(),
        name: id.to_string(),
        location: "Viet Nam".into(),
        images: vec![],
        categories: vec![],
        description: String::new(),
        lat: 20.9,
        lon: 107.1,
        rating: 0.0,
        reviews: 0,
        avg_sentiment_score: None,
        active: true,
        is_featured: false,
        created_at: base_time(),
    }
}
