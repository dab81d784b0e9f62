// src/controllers/favorite_controller.rs
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde_json::json;

use crate::{
    auth, error::ServiceError, models::favorite::SaveFavoriteRequest,
    services::favorite_service, state::AppState,
};

#[get("/api/favorites")]
pub async fn get_favorites(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let caller = auth::require_user(&req, &state).await?;
    let places = favorite_service::saved_places(state.store.as_ref(), &caller).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": places })))
}

#[post("/api/favorites")]
pub async fn save_favorite(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SaveFavoriteRequest>,
) -> Result<HttpResponse, ServiceError> {
    let caller = auth::require_user(&req, &state).await?;
    let favorite =
        favorite_service::save_place(state.store.as_ref(), &caller, &body.place_id).await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Place saved",
        "data": favorite,
    })))
}

#[delete("/api/favorites/{place_id}")]
pub async fn delete_favorite(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let caller = auth::require_user(&req, &state).await?;
    let place_id = path.into_inner();
    favorite_service::remove_place(state.store.as_ref(), &caller, &place_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Place removed",
    })))
}
