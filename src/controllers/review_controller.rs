// src/controllers/review_controller.rs
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::Utc;
use serde_json::json;

use crate::{
    auth, error::ServiceError, models::review::NewReviewRequest, services::review_service,
    state::AppState,
};

#[get("/api/reviews/{place_id}")]
pub async fn get_reviews(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let place_id = path.into_inner();
    let reviews = review_service::list_reviews(state.store.as_ref(), &place_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": reviews })))
}

#[post("/api/reviews/{place_id}")]
pub async fn create_review(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NewReviewRequest>,
) -> Result<HttpResponse, ServiceError> {
    let caller = auth::require_user(&req, &state).await?;
    let place_id = path.into_inner();
    let review = review_service::add_review(
        state.store.as_ref(),
        &caller,
        &place_id,
        body.into_inner(),
        Utc::now(),
    )
    .await?;
    Ok(HttpResponse::Created().json(json!({ "success": true, "data": review })))
}
