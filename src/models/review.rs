// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: String,
    pub place_id: String,
    pub users_id: String,
    pub content: String,
    pub stars: i32,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewAuthor {
    pub id: String,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    pub users: Option<ReviewAuthor>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewReviewRequest {
    #[validate(length(min = 3, max = 1000, message = "Content must be 3-1000 characters"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "Star rating must be between 1 and 5"))]
    pub star: i32,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub id: String,
    pub place_id: String,
    pub users_id: String,
    pub content: String,
    pub stars: i32,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<NewReview> for Review {
    fn from(new: NewReview) -> Self {
        Review {
            id: new.id,
            place_id: new.place_id,
            users_id: new.users_id,
            content: new.content,
            stars: new.stars,
            score: new.score,
            created_at: new.created_at,
        }
    }
}
