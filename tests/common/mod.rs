#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Duration, TimeZone, Utc};
use destinations_api::{
    auth::{JwtSettings, generate_jwt},
    models::{listing::Listing, user::UserProfile},
    state::AppState,
    store::MemoryStore,
};

pub const ADMIN_ID: &str = "admin-1";
pub const USER_ID: &str = "user-1";

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: "integration-test-secret".to_string(),
        audience: None,
    }
}

pub fn token_for(user_id: &str) -> String {
    generate_jwt(user_id, &jwt_settings(), Duration::hours(1)).expect("token")
}

pub fn bearer(user_id: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user_id)))
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

/// Active, unrated listing created `n` minutes after the base time.
pub fn place(n: i64) -> Listing {
    Listing {
        place_id: format!("place-{n}"),
        slug: format!("place-{n}"),
        name: format!("Place {n}"),
        location: "Quang Ninh".to_string(),
        images: vec![format!("https://img.example/{n}.jpg")],
        categories: Vec::new(),
        description: String::new(),
        lat: 20.9,
        lon: 107.1,
        rating: 0.0,
        reviews: 0,
        avg_sentiment_score: None,
        active: true,
        is_featured: false,
        created_at: base_time() + Duration::minutes(n),
    }
}

pub fn profile(id: &str, role: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        username: Some(format!("{id}-name")),
        role: role.to_string(),
        avatar: None,
        created_at: base_time(),
    }
}

/// Store seeded with the given listings plus one admin and one regular user.
pub fn seeded(listings: Vec<Listing>) -> MemoryStore {
    MemoryStore::with_listings(listings)
        .with_users(vec![profile(ADMIN_ID, "admin"), profile(USER_ID, "user")])
}

pub fn state(store: MemoryStore) -> web::Data<AppState> {
    web::Data::new(AppState::new(Arc::new(store), jwt_settings()))
}

macro_rules! test_app {
    ($store:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(common::state($store))
                .configure(destinations_api::controllers::configure),
        )
        .await
    };
}
