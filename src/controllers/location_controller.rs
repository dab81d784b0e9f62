// src/controllers/location_controller.rs
use actix_web::{HttpRequest, HttpResponse, get, patch, post, web};
use chrono::Utc;
use serde_json::json;

use crate::{
    auth::{self, Caller},
    error::ServiceError,
    models::listing::{ListingPage, ListingQueryParams, NewListingRequest, SetActiveRequest},
    services::listing_service,
    state::AppState,
};

fn page_response(page: ListingPage) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": page.data,
        "nextPage": page.next_page,
        "hasMore": page.has_more,
        "total": page.total,
    }))
}

/// Public listing; visibility is pinned to active rows regardless of query.
#[get("/api/locations")]
pub async fn get_locations(
    state: web::Data<AppState>,
    query: web::Query<ListingQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let page =
        listing_service::list_from_params(state.store.as_ref(), &Caller::anonymous(), &query)
            .await?;
    Ok(page_response(page))
}

#[get("/api/locations/similar/{id}")]
pub async fn get_similar(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    let rows = listing_service::get_similar(state.store.as_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": rows })))
}

#[get("/api/locations/admin")]
pub async fn admin_get_locations(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListingQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let caller = auth::require_admin(&req, &state).await?;
    let page = listing_service::list_from_params(state.store.as_ref(), &caller, &query).await?;
    Ok(page_response(page))
}

#[get("/api/locations/admin/stat")]
pub async fn get_stats(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    auth::require_admin(&req, &state).await?;
    let stats = listing_service::get_stats(state.store.as_ref(), Utc::now()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats })))
}

#[patch("/api/locations/admin/{id}/active")]
pub async fn set_active(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SetActiveRequest>,
) -> Result<HttpResponse, ServiceError> {
    let caller = auth::require_admin(&req, &state).await?;
    let id = path.into_inner();
    let listing = listing_service::set_active(state.store.as_ref(), &id, body.active).await?;
    log::info!(
        "listing {} set active={} by {}",
        listing.place_id,
        listing.active,
        caller.user_id.as_deref().unwrap_or("-")
    );
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": listing })))
}

#[post("/api/locations/admin/new")]
pub async fn create_location(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<NewListingRequest>,
) -> Result<HttpResponse, ServiceError> {
    auth::require_admin(&req, &state).await?;
    let listing =
        listing_service::create_listing(state.store.as_ref(), body.into_inner(), Utc::now())
            .await?;
    Ok(HttpResponse::Created().json(json!({ "success": true, "data": listing })))
}

/// Admins also see inactive listings. A stale token here degrades to an
/// anonymous view instead of failing a public page.
#[get("/api/locations/{id}")]
pub async fn get_location_by_id(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let caller = match auth::resolve_caller(&req, &state).await {
        Ok(caller) => caller,
        Err(e) => {
            log::warn!("ignoring unusable token on {}: {}", req.path(), e);
            Caller::anonymous()
        }
    };
    let id = path.into_inner();
    let listing = listing_service::get_by_id(state.store.as_ref(), &caller, &id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": listing })))
}
