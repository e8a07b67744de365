//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use techsprint_db::entities::admin::{self, AdminRole};

/// Authenticated admin extractor. Any role.
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub admin::Model);

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware on a valid session token
        parts
            .extensions
            .get::<admin::Model>()
            .cloned()
            .map(AuthAdmin)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Authenticated MAIN admin extractor.
///
/// The role gate runs before any handler body, so a SUB admin hitting a
/// management route is refused before any data is fetched.
#[derive(Debug, Clone)]
pub struct MainAdmin(pub admin::Model);

impl<S> FromRequestParts<S> for MainAdmin
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = parts
            .extensions
            .get::<admin::Model>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))?;

        if admin.role != AdminRole::Main {
            return Err((StatusCode::FORBIDDEN, "Main admin role required"));
        }

        Ok(Self(admin))
    }
}
