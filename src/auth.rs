use actix_web::HttpRequest;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::AppConfig, error::ServiceError, models::user::ADMIN_ROLE, state::AppState,
    store::UserStore,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub audience: Option<String>,
}

impl From<&AppConfig> for JwtSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            audience: config.jwt_audience.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl Role {
    fn from_profile(role: &str) -> Self {
        if role.eq_ignore_ascii_case(ADMIN_ROLE) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Who is asking. Passed explicitly into every service call that cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<String>,
    pub role: Role,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            role: Role::Guest,
        }
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Role::User,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_user_id(&self) -> Result<&str, ServiceError> {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("Unauthorized".into()))
    }
}

pub fn generate_jwt(
    user_id: &str,
    settings: &JwtSettings,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + ttl).timestamp().max(0) as usize,
        email: None,
        aud: settings.audience.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
}

pub fn verify_jwt(token: &str, settings: &JwtSettings) -> Result<Claims, ServiceError> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &settings.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        log::warn!("JWT verification failed: {:?}", e);
        ServiceError::Unauthorized("Invalid or expired token".into())
    })?;

    Ok(token_data.claims)
}

/// Bearer header first, then the `access_token` cookie.
fn extract_token(req: &HttpRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    from_header.or_else(|| {
        req.cookie("access_token")
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Anonymous when no token is present; a present but invalid token is an error.
pub async fn resolve_caller(req: &HttpRequest, state: &AppState) -> Result<Caller, ServiceError> {
    let Some(token) = extract_token(req) else {
        return Ok(Caller::anonymous());
    };

    let claims = verify_jwt(&token, &state.jwt)?;
    if claims.sub.is_empty() {
        return Err(ServiceError::Unauthorized("Invalid token".into()));
    }

    let profile = state
        .store
        .find_user(&claims.sub)
        .await
        .map_err(|e| ServiceError::fetch_failed("resolve_caller", e))?;

    let role = profile
        .map(|p| Role::from_profile(&p.role))
        .unwrap_or(Role::User);

    Ok(Caller {
        user_id: Some(claims.sub),
        role,
    })
}

pub async fn require_user(req: &HttpRequest, state: &AppState) -> Result<Caller, ServiceError> {
    let caller = resolve_caller(req, state).await?;
    if caller.user_id.is_none() {
        log::warn!("No token found in request to {}", req.path());
        return Err(ServiceError::Unauthorized("Unauthorized".into()));
    }
    Ok(caller)
}

pub async fn require_admin(req: &HttpRequest, state: &AppState) -> Result<Caller, ServiceError> {
    let caller = require_user(req, state).await?;
    if !caller.is_admin() {
        return Err(ServiceError::Forbidden("Admin access required".into()));
    }
    Ok(caller)
}
