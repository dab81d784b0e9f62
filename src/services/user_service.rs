use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Caller,
    error::ServiceError,
    models::user::{NewUser, UpsertUserRequest, UserProfile},
    store::UserStore,
};

/// Mirrors a profile from the identity provider; keyed on email.
pub async fn upsert_user<S>(
    store: &S,
    mut request: UpsertUserRequest,
    now: DateTime<Utc>,
) -> Result<UserProfile, ServiceError>
where
    S: UserStore + ?Sized,
{
    request.email = request.email.trim().to_lowercase();
    if request.email.is_empty() {
        return Err(ServiceError::invalid("Email is required"));
    }
    request.validate()?;

    let user = NewUser {
        id: request
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        email: request.email,
        username: request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        created_at: now,
    };

    store
        .upsert_user(&user)
        .await
        .map_err(|e| ServiceError::update_failed("upsert_user", e))
}

pub async fn get_me<S>(store: &S, caller: &Caller) -> Result<UserProfile, ServiceError>
where
    S: UserStore + ?Sized,
{
    let user_id = caller.require_user_id()?;
    store
        .find_user(user_id)
        .await
        .map_err(|e| ServiceError::fetch_failed("get_me", e))?
        .ok_or_else(|| ServiceError::NotFound("User not found".into()))
}
