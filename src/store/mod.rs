//! Storage seams. Each table family gets its own trait; [`Store`] bundles
//! them for the application state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    models::{
        favorite::{Favorite, SavedPlace},
        listing::{Listing, ListingCounts, NewListing},
        review::{NewReview, Review, ReviewWithAuthor},
        user::{NewUser, UserProfile},
    },
    services::{listing_query::ListingQuery, similar::SimilarQuery},
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("referenced row does not exist: {0}")]
    MissingParent(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::UniqueViolation(db.message().to_string());
            }
            if db.is_foreign_key_violation() {
                return StoreError::MissingParent(db.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// One page of rows plus the count of all rows matching the same filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSlice {
    pub rows: Vec<Listing>,
    pub total: i64,
}

/// Boundaries for the admin stats aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub recent_since: DateTime<Utc>,
    pub this_month_start: DateTime<Utc>,
    pub last_month_start: DateTime<Utc>,
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn find_listings(&self, query: &ListingQuery) -> Result<ListingSlice, StoreError>;

    async fn find_listing(&self, place_id: &str) -> Result<Option<Listing>, StoreError>;

    async fn find_categories(&self, place_id: &str) -> Result<Option<Vec<String>>, StoreError>;

    async fn find_similar(&self, query: &SimilarQuery) -> Result<Vec<Listing>, StoreError>;

    /// Returns the updated row, or `None` when no row has this id.
    async fn set_active(&self, place_id: &str, active: bool)
    -> Result<Option<Listing>, StoreError>;

    async fn count_listings(&self, window: &StatsWindow) -> Result<ListingCounts, StoreError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError>;

    async fn insert_listing(&self, listing: &NewListing) -> Result<Listing, StoreError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Inserts the review and refreshes the parent's rating, review count and
    /// average sentiment in the same unit of work.
    async fn insert_review(&self, review: &NewReview) -> Result<Review, StoreError>;

    async fn reviews_for_place(&self, place_id: &str)
    -> Result<Vec<ReviewWithAuthor>, StoreError>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn insert_favorite(&self, user_id: &str, place_id: &str)
    -> Result<Favorite, StoreError>;

    async fn saved_places(&self, user_id: &str, limit: i64)
    -> Result<Vec<SavedPlace>, StoreError>;

    async fn delete_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn upsert_user(&self, user: &NewUser) -> Result<UserProfile, StoreError>;

    async fn find_user(&self, id: &str) -> Result<Option<UserProfile>, StoreError>;
}

pub trait Store: ListingStore + ReviewStore + FavoriteStore + UserStore {}

impl<T> Store for T where T: ListingStore + ReviewStore + FavoriteStore + UserStore {}
