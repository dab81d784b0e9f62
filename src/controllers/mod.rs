use actix_web::web::{self, JsonConfig, QueryConfig};

use crate::error::ServiceError;

pub mod auth_controller;
pub mod favorite_controller;
pub mod location_controller;
pub mod review_controller;

/// Mounts every `/api` route. Literal admin paths are registered ahead of
/// `/api/locations/{id}` so they are not captured as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        //location_controller
        .service(location_controller::get_locations)
        .service(location_controller::get_similar)
        .service(location_controller::admin_get_locations)
        .service(location_controller::get_stats)
        .service(location_controller::set_active)
        .service(location_controller::create_location)
        .service(location_controller::get_location_by_id)
        //review_controller
        .service(review_controller::get_reviews)
        .service(review_controller::create_review)
        //favorite_controller
        .service(favorite_controller::get_favorites)
        .service(favorite_controller::save_favorite)
        .service(favorite_controller::delete_favorite)
        //auth_controller
        .service(auth_controller::upsert_user)
        .service(auth_controller::get_me);
}

pub fn json_config() -> JsonConfig {
    JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err, _req| {
            log::warn!("JSON payload error: {}", err);
            ServiceError::invalid(format!("Payload error: {}", err)).into()
        })
}

pub fn query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, _req| {
        log::warn!("query string error: {}", err);
        ServiceError::invalid(format!("Query error: {}", err)).into()
    })
}
