// src/store/mysql.rs
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

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

const LISTING_COLUMNS: &str = "place_id, slug, name, location, images, categories, description, \
     lat, lon, rating, reviews, avg_sentiment_score, active, is_featured, created_at";

const USER_COLUMNS: &str = "id, email, username, role, avatar, created_at";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn push_condition(qb: &mut QueryBuilder<'_, MySql>, first: &mut bool) {
    qb.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

/// Appends the WHERE clause shared by the page query and its count query.
pub(crate) fn push_listing_filters(qb: &mut QueryBuilder<'_, MySql>, query: &ListingQuery) {
    let mut first = true;

    if !query.categories.is_empty() {
        push_condition(qb, &mut first);
        qb.push("JSON_OVERLAPS(categories, CAST(")
            .push_bind(json!(query.categories).to_string())
            .push(" AS JSON))");
    }
    if let Some(min) = query.min_rating {
        push_condition(qb, &mut first);
        qb.push("rating >= ").push_bind(min);
    }
    if let Some(min) = query.min_sentiment {
        push_condition(qb, &mut first);
        qb.push("avg_sentiment_score >= ").push_bind(min);
    }
    if let Some(active) = query.active {
        push_condition(qb, &mut first);
        qb.push("active = ").push_bind(active);
    }
    if let Some(featured) = query.featured {
        push_condition(qb, &mut first);
        qb.push("is_featured = ").push_bind(featured);
    }
}

pub(crate) fn push_listing_page(qb: &mut QueryBuilder<'_, MySql>, query: &ListingQuery) {
    qb.push(" ORDER BY ")
        .push(query.sort.column())
        .push(" DESC LIMIT ")
        .push_bind(query.range.limit())
        .push(" OFFSET ")
        .push_bind(query.range.offset());
}

pub(crate) fn listing_page_query(query: &ListingQuery) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new(format!("SELECT {LISTING_COLUMNS} FROM places"));
    push_listing_filters(&mut qb, query);
    push_listing_page(&mut qb, query);
    qb
}

pub(crate) fn listing_count_query(query: &ListingQuery) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM places");
    push_listing_filters(&mut qb, query);
    qb
}

#[async_trait]
impl ListingStore for MySqlStore {
    async fn find_listings(&self, query: &ListingQuery) -> Result<ListingSlice, StoreError> {
        let mut page_qb = listing_page_query(query);
        let mut count_qb = listing_count_query(query);

        // Both reads share one InnoDB snapshot so `total` agrees with `rows`.
        let mut tx = self.pool.begin().await?;

        let rows = page_qb
            .build_query_as::<Listing>()
            .fetch_all(&mut *tx)
            .await?;

        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ListingSlice { rows, total })
    }

    async fn find_listing(&self, place_id: &str) -> Result<Option<Listing>, StoreError> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM places WHERE place_id = ?");
        let row = sqlx::query_as::<_, Listing>(&sql)
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_categories(&self, place_id: &str) -> Result<Option<Vec<String>>, StoreError> {
        let row = sqlx::query_scalar::<_, sqlx::types::Json<Vec<String>>>(
            "SELECT categories FROM places WHERE place_id = ?",
        )
        .bind(place_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|categories| categories.0))
    }

    async fn find_similar(&self, query: &SimilarQuery) -> Result<Vec<Listing>, StoreError> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM places
            WHERE JSON_OVERLAPS(categories, CAST(? AS JSON))
              AND place_id <> ?
              AND active = TRUE
            ORDER BY rating DESC
            LIMIT ?
            "#
        );
        let rows = sqlx::query_as::<_, Listing>(&sql)
            .bind(json!(query.categories).to_string())
            .bind(&query.place_id)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_active(
        &self,
        place_id: &str,
        active: bool,
    ) -> Result<Option<Listing>, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE places SET active = ? WHERE place_id = ?")
            .bind(active)
            .bind(place_id)
            .execute(&mut *tx)
            .await?;

        // rows_affected() is 0 for a no-op update in MySQL, so read the row back.
        let sql = format!("SELECT {LISTING_COLUMNS} FROM places WHERE place_id = ?");
        let row = sqlx::query_as::<_, Listing>(&sql)
            .bind(place_id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn count_listings(&self, window: &StatsWindow) -> Result<ListingCounts, StoreError> {
        let counts = sqlx::query_as::<_, ListingCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                CAST(SUM(active = TRUE) AS SIGNED) AS active,
                CAST(SUM(is_featured = TRUE) AS SIGNED) AS featured,
                CAST(SUM(created_at >= ?) AS SIGNED) AS recent,
                CAST(SUM(created_at >= ?) AS SIGNED) AS this_month,
                CAST(SUM(created_at >= ? AND created_at < ?) AS SIGNED) AS last_month
            FROM places
            "#,
        )
        .bind(window.recent_since)
        .bind(window.this_month_start)
        .bind(window.last_month_start)
        .bind(window.this_month_start)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM places WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn insert_listing(&self, listing: &NewListing) -> Result<Listing, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO places
            (place_id, slug, name, location, images, categories, description,
             lat, lon, rating, reviews, avg_sentiment_score, active, is_featured, created_at)
            VALUES (?, ?, ?, ?, CAST(? AS JSON), CAST(? AS JSON), ?, ?, ?, 0, 0, NULL, ?, ?, ?)
            "#,
        )
        .bind(&listing.place_id)
        .bind(&listing.slug)
        .bind(&listing.name)
        .bind(&listing.location)
        .bind(json!(listing.images).to_string())
        .bind(json!(listing.categories).to_string())
        .bind(&listing.description)
        .bind(listing.lat)
        .bind(listing.lon)
        .bind(listing.active)
        .bind(listing.is_featured)
        .bind(listing.created_at)
        .execute(&self.pool)
        .await?;

        self.find_listing(&listing.place_id)
            .await?
            .ok_or_else(|| StoreError::MissingParent(format!("place {}", listing.place_id)))
    }
}

#[async_trait]
impl ReviewStore for MySqlStore {
    async fn insert_review(&self, review: &NewReview) -> Result<Review, StoreError> {
        let mut tx = self.pool.begin().await?;

        let parent = sqlx::query_scalar::<_, String>(
            "SELECT place_id FROM places WHERE place_id = ? FOR UPDATE",
        )
        .bind(&review.place_id)
        .fetch_optional(&mut *tx)
        .await?;
        if parent.is_none() {
            return Err(StoreError::MissingParent(format!("place {}", review.place_id)));
        }

        sqlx::query(
            r#"
            INSERT INTO reviews (id, place_id, users_id, content, stars, score, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&review.id)
        .bind(&review.place_id)
        .bind(&review.users_id)
        .bind(&review.content)
        .bind(review.stars)
        .bind(review.score)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE places SET
                reviews = (SELECT COUNT(*) FROM reviews WHERE place_id = ?),
                rating = (SELECT COALESCE(ROUND(AVG(stars), 1), 0) FROM reviews WHERE place_id = ?),
                avg_sentiment_score = (SELECT ROUND(AVG(score)) FROM reviews WHERE place_id = ?)
            WHERE place_id = ?
            "#,
        )
        .bind(&review.place_id)
        .bind(&review.place_id)
        .bind(&review.place_id)
        .bind(&review.place_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Review::from(review.clone()))
    }

    async fn reviews_for_place(
        &self,
        place_id: &str,
    ) -> Result<Vec<ReviewWithAuthor>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.place_id, r.users_id, r.content, r.stars, r.score, r.created_at,
                   u.id AS author_id, u.username AS author_username, u.avatar AS author_avatar
            FROM reviews r
            LEFT JOIN users u ON u.id = r.users_id
            WHERE r.place_id = ?
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await?;

        let mut reviews = Vec::with_capacity(rows.len());
        for row in rows {
            let author_id: Option<String> = row.try_get("author_id")?;
            reviews.push(ReviewWithAuthor {
                review: Review {
                    id: row.try_get("id")?,
                    place_id: row.try_get("place_id")?,
                    users_id: row.try_get("users_id")?,
                    content: row.try_get("content")?,
                    stars: row.try_get("stars")?,
                    score: row.try_get("score")?,
                    created_at: row.try_get("created_at")?,
                },
                users: match author_id {
                    Some(id) => Some(ReviewAuthor {
                        id,
                        username: row.try_get("author_username")?,
                        avatar: row.try_get("author_avatar")?,
                    }),
                    None => None,
                },
            });
        }
        Ok(reviews)
    }
}

#[async_trait]
impl FavoriteStore for MySqlStore {
    async fn insert_favorite(
        &self,
        user_id: &str,
        place_id: &str,
    ) -> Result<Favorite, StoreError> {
        let favorite = Favorite {
            user_id: user_id.to_string(),
            place_id: place_id.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO saved_places (user_id, place_id, created_at) VALUES (?, ?, ?)")
            .bind(&favorite.user_id)
            .bind(&favorite.place_id)
            .bind(favorite.created_at)
            .execute(&self.pool)
            .await?;

        Ok(favorite)
    }

    async fn saved_places(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<SavedPlace>, StoreError> {
        let places = sqlx::query_as::<_, PlaceSummary>(
            r#"
            SELECT p.place_id, p.name, p.slug, p.location, p.images, p.categories,
                   p.rating, p.reviews, p.avg_sentiment_score
            FROM saved_places s
            JOIN places p ON p.place_id = s.place_id
            WHERE s.user_id = ?
            ORDER BY s.created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(places
            .into_iter()
            .map(|places| SavedPlace {
                place_id: places.place_id.clone(),
                places,
            })
            .collect())
    }

    async fn delete_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM saved_places WHERE user_id = ? AND place_id = ?")
            .bind(user_id)
            .bind(place_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for MySqlStore {
    async fn upsert_user(&self, user: &NewUser) -> Result<UserProfile, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, created_at)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE username = COALESCE(VALUES(username), username)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let profile = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn find_user(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let profile = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }
}
