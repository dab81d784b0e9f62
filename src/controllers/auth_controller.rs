// src/controllers/auth_controller.rs
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::Utc;
use serde_json::json;

use crate::{
    auth, error::ServiceError, models::user::UpsertUserRequest, services::user_service,
    state::AppState,
};

/// Profile sync called by the frontend after sign-up with the identity provider.
#[post("/api/auth")]
pub async fn upsert_user(
    state: web::Data<AppState>,
    body: web::Json<UpsertUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user =
        user_service::upsert_user(state.store.as_ref(), body.into_inner(), Utc::now()).await?;
    log::info!("synced profile {}", user.id);
    Ok(HttpResponse::Created().json(json!({ "success": true, "data": user })))
}

#[get("/api/auth/me")]
pub async fn get_me(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let caller = auth::require_user(&req, &state).await?;
    let user = user_service::get_me(state.store.as_ref(), &caller).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": user })))
}
