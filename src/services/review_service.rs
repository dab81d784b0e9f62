use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Caller,
    error::ServiceError,
    models::review::{NewReview, NewReviewRequest, Review, ReviewWithAuthor},
    store::{ReviewStore, StoreError},
    utils::simulated_sentiment_score,
};

/// The parent listing's rating and counters are refreshed by the store in
/// the same unit of work as the insert.
pub async fn add_review<S>(
    store: &S,
    caller: &Caller,
    place_id: &str,
    mut request: NewReviewRequest,
    now: DateTime<Utc>,
) -> Result<Review, ServiceError>
where
    S: ReviewStore + ?Sized,
{
    let user_id = caller.require_user_id()?;
    let place_id = place_id.trim();
    if place_id.is_empty() {
        return Err(ServiceError::invalid("Place ID is required"));
    }

    request.content = request.content.trim().to_string();
    request.validate()?;

    let review = NewReview {
        id: Uuid::new_v4().to_string(),
        place_id: place_id.to_string(),
        users_id: user_id.to_string(),
        content: request.content,
        stars: request.star,
        score: simulated_sentiment_score(),
        created_at: now,
    };

    match store.insert_review(&review).await {
        Ok(saved) => {
            log::info!("review {} added to {} by {}", saved.id, saved.place_id, user_id);
            Ok(saved)
        }
        Err(StoreError::MissingParent(_)) => Err(ServiceError::NotFound("Place not found".into())),
        Err(e) => Err(ServiceError::update_failed("add_review", e)),
    }
}

/// Newest first.
pub async fn list_reviews<S>(
    store: &S,
    place_id: &str,
) -> Result<Vec<ReviewWithAuthor>, ServiceError>
where
    S: ReviewStore + ?Sized,
{
    let place_id = place_id.trim();
    if place_id.is_empty() {
        return Err(ServiceError::invalid("Place ID is required"));
    }

    store
        .reviews_for_place(place_id)
        .await
        .map_err(|e| ServiceError::fetch_failed("list_reviews", e))
}
