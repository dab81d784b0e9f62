//! In-process store for local runs without MySQL and for tests. Rows keep
//! insertion order, so equal sort keys come back oldest-inserted first.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    models::{
        favorite::{Favorite, PlaceSummary, SavedPlace},
        listing::{Listing, ListingCounts, NewListing},
        review::{NewReview, Review, ReviewAuthor, ReviewWithAuthor},
        user::{NewUser, UserProfile},
    },
    services::{listing_query::ListingQuery, similar::SimilarQuery},
    store::{
        FavoriteStore, ListingSlice, ListingStore, ReviewStore, StatsWindow, StoreError,
        UserStore,
    },
};

#[derive(Default)]
struct Tables {
    places: Vec<Listing>,
    reviews: Vec<Review>,
    favorites: Vec<Favorite>,
    users: Vec<UserProfile>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(listings: Vec<Listing>) -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.tables.write() {
            tables.places = listings;
        }
        store
    }

    pub fn with_users(self, users: Vec<UserProfile>) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.users.extend(users);
        }
        self
    }

    fn read(&self, op: &'static str) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned(op))
    }

    fn write(&self, op: &'static str) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned(op))
    }
}

fn summary(listing: &Listing) -> PlaceSummary {
    PlaceSummary {
        place_id: listing.place_id.clone(),
        name: listing.name.clone(),
        slug: listing.slug.clone(),
        location: listing.location.clone(),
        images: listing.images.clone(),
        categories: listing.categories.clone(),
        rating: listing.rating,
        reviews: listing.reviews,
        avg_sentiment_score: listing.avg_sentiment_score,
    }
}

fn refresh_aggregates(tables: &mut Tables, place_id: &str) {
    let (count, stars, scores) = tables
        .reviews
        .iter()
        .filter(|r| r.place_id == place_id)
        .fold((0i64, 0i64, 0i64), |(n, s, c), r| {
            (n + 1, s + i64::from(r.stars), c + i64::from(r.score))
        });

    if let Some(place) = tables.places.iter_mut().find(|p| p.place_id == place_id) {
        place.reviews = count;
        if count > 0 {
            let avg = stars as f64 / count as f64;
            place.rating = (avg * 10.0).round() / 10.0;
            place.avg_sentiment_score = Some((scores as f64 / count as f64).round() as i32);
        } else {
            place.rating = 0.0;
            place.avg_sentiment_score = None;
        }
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn find_listings(&self, query: &ListingQuery) -> Result<ListingSlice, StoreError> {
        let tables = self.read("find_listings")?;

        let mut matching: Vec<&Listing> =
            tables.places.iter().filter(|p| query.matches(p)).collect();
        matching.sort_by(|a, b| query.sort.compare(a, b));

        let total = matching.len() as i64;
        let rows = matching
            .into_iter()
            .skip(query.range.offset().max(0) as usize)
            .take(query.range.limit().max(0) as usize)
            .cloned()
            .collect();

        Ok(ListingSlice { rows, total })
    }

    async fn find_listing(&self, place_id: &str) -> Result<Option<Listing>, StoreError> {
        let tables = self.read("find_listing")?;
        Ok(tables.places.iter().find(|p| p.place_id == place_id).cloned())
    }

    async fn find_categories(&self, place_id: &str) -> Result<Option<Vec<String>>, StoreError> {
        let tables = self.read("find_categories")?;
        Ok(tables
            .places
            .iter()
            .find(|p| p.place_id == place_id)
            .map(|p| p.categories.clone()))
    }

    async fn find_similar(&self, query: &SimilarQuery) -> Result<Vec<Listing>, StoreError> {
        let tables = self.read("find_similar")?;

        let mut rows: Vec<&Listing> = tables.places.iter().filter(|p| query.matches(p)).collect();
        rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));

        Ok(rows
            .into_iter()
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn set_active(
        &self,
        place_id: &str,
        active: bool,
    ) -> Result<Option<Listing>, StoreError> {
        let mut tables = self.write("set_active")?;
        Ok(tables
            .places
            .iter_mut()
            .find(|p| p.place_id == place_id)
            .map(|p| {
                p.active = active;
                p.clone()
            }))
    }

    async fn count_listings(&self, window: &StatsWindow) -> Result<ListingCounts, StoreError> {
        let tables = self.read("count_listings")?;
        let places = &tables.places;
        let count =
            |pred: &dyn Fn(&Listing) -> bool| places.iter().filter(|p| pred(p)).count() as i64;

        // SUM over zero rows is NULL in SQL; only COUNT(*) yields a value.
        if places.is_empty() {
            return Ok(ListingCounts {
                total: Some(0),
                ..ListingCounts::default()
            });
        }

        Ok(ListingCounts {
            total: Some(places.len() as i64),
            active: Some(count(&|p| p.active)),
            featured: Some(count(&|p| p.is_featured)),
            recent: Some(count(&|p| p.created_at >= window.recent_since)),
            this_month: Some(count(&|p| p.created_at >= window.this_month_start)),
            last_month: Some(count(&|p| {
                p.created_at >= window.last_month_start && p.created_at < window.this_month_start
            })),
        })
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        let tables = self.read("slug_exists")?;
        Ok(tables.places.iter().any(|p| p.slug == slug))
    }

    async fn insert_listing(&self, listing: &NewListing) -> Result<Listing, StoreError> {
        let mut tables = self.write("insert_listing")?;
        if tables.places.iter().any(|p| p.slug == listing.slug) {
            return Err(StoreError::UniqueViolation(format!("slug {}", listing.slug)));
        }

        let row = Listing {
            place_id: listing.place_id.clone(),
            slug: listing.slug.clone(),
            name: listing.name.clone(),
            location: listing.location.clone(),
            images: listing.images.clone(),
            categories: listing.categories.clone(),
            description: listing.description.clone(),
            lat: listing.lat,
            lon: listing.lon,
            rating: 0.0,
            reviews: 0,
            avg_sentiment_score: None,
            active: listing.active,
            is_featured: listing.is_featured,
            created_at: listing.created_at,
        };
        tables.places.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert_review(&self, review: &NewReview) -> Result<Review, StoreError> {
        let mut tables = self.write("insert_review")?;
        if !tables.places.iter().any(|p| p.place_id == review.place_id) {
            return Err(StoreError::MissingParent(format!("place {}", review.place_id)));
        }

        let saved = Review::from(review.clone());
        tables.reviews.push(saved.clone());
        refresh_aggregates(&mut tables, &review.place_id);
        Ok(saved)
    }

    async fn reviews_for_place(
        &self,
        place_id: &str,
    ) -> Result<Vec<ReviewWithAuthor>, StoreError> {
        let tables = self.read("reviews_for_place")?;

        let mut reviews: Vec<&Review> = tables
            .reviews
            .iter()
            .rev()
            .filter(|r| r.place_id == place_id)
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(reviews
            .into_iter()
            .map(|review| ReviewWithAuthor {
                review: review.clone(),
                users: tables
                    .users
                    .iter()
                    .find(|u| u.id == review.users_id)
                    .map(|u| ReviewAuthor {
                        id: u.id.clone(),
                        username: u.username.clone(),
                        avatar: u.avatar.clone(),
                    }),
            })
            .collect())
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn insert_favorite(
        &self,
        user_id: &str,
        place_id: &str,
    ) -> Result<Favorite, StoreError> {
        let mut tables = self.write("insert_favorite")?;
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.place_id == place_id)
        {
            return Err(StoreError::UniqueViolation("saved_places primary key".into()));
        }
        if !tables.places.iter().any(|p| p.place_id == place_id) {
            return Err(StoreError::MissingParent(format!("place {place_id}")));
        }

        let favorite = Favorite {
            user_id: user_id.to_string(),
            place_id: place_id.to_string(),
            created_at: Utc::now(),
        };
        tables.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn saved_places(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<SavedPlace>, StoreError> {
        let tables = self.read("saved_places")?;

        Ok(tables
            .favorites
            .iter()
            .rev()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| tables.places.iter().find(|p| p.place_id == f.place_id))
            .take(limit.max(0) as usize)
            .map(|p| SavedPlace {
                place_id: p.place_id.clone(),
                places: summary(p),
            })
            .collect())
    }

    async fn delete_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError> {
        let mut tables = self.write("delete_favorite")?;
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.place_id == place_id));
        Ok(tables.favorites.len() < before)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert_user(&self, user: &NewUser) -> Result<UserProfile, StoreError> {
        let mut tables = self.write("upsert_user")?;

        if let Some(existing) = tables.users.iter_mut().find(|u| u.email == user.email) {
            if user.username.is_some() {
                existing.username = user.username.clone();
            }
            return Ok(existing.clone());
        }
        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::UniqueViolation(format!("user id {}", user.id)));
        }

        let profile = UserProfile {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: "user".into(),
            avatar: None,
            created_at: user.created_at,
        };
        tables.users.push(profile.clone());
        Ok(profile)
    }

    async fn find_user(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        let tables = self.read("find_user")?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}
