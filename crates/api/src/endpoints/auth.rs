//! Admin authentication endpoints.

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use techsprint_common::AppResult;
use techsprint_db::entities::admin::AdminRole;

use crate::{middleware::AppState, response::ApiResponse};

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Admin summary returned to the console.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub id: String,
    pub username: String,
    pub role: AdminRole,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::FixedOffset>,
    pub admin: AdminSummary,
}

/// Log in with username and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let result = state
        .admin_service
        .login(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        token: result.session.token,
        expires_at: result.session.expires_at,
        admin: AdminSummary {
            id: result.admin.id,
            username: result.admin.username,
            role: result.admin.role,
        },
    }))
}

/// Logout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Log out: the session is deleted server-side, so the token is dead even
/// if a client keeps a copy.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<LogoutResponse>> {
    if let Some(token) = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.admin_service.logout(token).await?;
    }

    Ok(ApiResponse::ok(LogoutResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}
