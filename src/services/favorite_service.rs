use crate::{
    auth::Caller,
    error::ServiceError,
    models::favorite::{Favorite, SavedPlace},
    store::{FavoriteStore, StoreError},
};

pub const SAVED_PLACES_LIMIT: i64 = 10;

fn require_place_id(place_id: &str) -> Result<&str, ServiceError> {
    let place_id = place_id.trim();
    if place_id.is_empty() {
        return Err(ServiceError::invalid("Place id, User Id is required"));
    }
    Ok(place_id)
}

pub async fn save_place<S>(
    store: &S,
    caller: &Caller,
    place_id: &str,
) -> Result<Favorite, ServiceError>
where
    S: FavoriteStore + ?Sized,
{
    let user_id = caller.require_user_id()?;
    let place_id = require_place_id(place_id)?;

    store
        .insert_favorite(user_id, place_id)
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => ServiceError::Conflict("Place already saved".into()),
            StoreError::MissingParent(_) => ServiceError::NotFound("Place not found".into()),
            other => ServiceError::update_failed("save_place", other),
        })
}

pub async fn saved_places<S>(store: &S, caller: &Caller) -> Result<Vec<SavedPlace>, ServiceError>
where
    S: FavoriteStore + ?Sized,
{
    let user_id = caller.require_user_id()?;
    store
        .saved_places(user_id, SAVED_PLACES_LIMIT)
        .await
        .map_err(|e| ServiceError::fetch_failed("saved_places", e))
}

pub async fn remove_place<S>(store: &S, caller: &Caller, place_id: &str) -> Result<(), ServiceError>
where
    S: FavoriteStore + ?Sized,
{
    let user_id = caller.require_user_id()?;
    let place_id = require_place_id(place_id)?;

    let removed = store
        .delete_favorite(user_id, place_id)
        .await
        .map_err(|e| ServiceError::update_failed("remove_place", e))?;

    if removed {
        Ok(())
    } else {
        Err(ServiceError::NotFound("Saved place not found".into()))
    }
}
