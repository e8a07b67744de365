//! Verification console endpoints (sub admins).

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use techsprint_common::AppResult;
use techsprint_core::{RegistrationStats, TransitionOutcome};
use techsprint_db::entities::registrant::{self, RegistrationStatus};

use crate::{extractors::AuthAdmin, middleware::AppState, response::ApiResponse};

/// List registrants for review: open work first, then newest.
async fn list_registrants(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<registrant::Model>>> {
    let registrants = state.registration_service.list_for_review().await?;
    Ok(ApiResponse::ok(registrants))
}

/// Registration counters.
async fn stats(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<RegistrationStats>> {
    Ok(ApiResponse::ok(state.registration_service.stats().await?))
}

/// Transition result as reported to the acting admin.
///
/// `applied = false` is the "someone else already handled this" case: not a
/// failure, just information.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrant: Option<registrant::Model>,
}

impl From<TransitionOutcome> for TransitionResponse {
    fn from(outcome: TransitionOutcome) -> Self {
        match outcome {
            TransitionOutcome::Applied(row) => Self {
                applied: true,
                message: None,
                registrant: Some(row),
            },
            TransitionOutcome::AlreadyHandled => Self {
                applied: false,
                message: Some("Another admin already handled this registrant".to_string()),
                registrant: None,
            },
        }
    }
}

/// Claim a registrant for manual review.
async fn claim(
    AuthAdmin(admin): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TransitionResponse>> {
    let outcome = state
        .verification_service
        .transition(&id, &admin.id, RegistrationStatus::Verifying, "START_VERIFICATION")
        .await?;
    Ok(Json(outcome.into()))
}

/// Approve a registrant's payment.
async fn approve(
    AuthAdmin(admin): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TransitionResponse>> {
    let outcome = state
        .verification_service
        .transition(&id, &admin.id, RegistrationStatus::Approved, "APPROVE_PAYMENT")
        .await?;
    Ok(Json(outcome.into()))
}

/// Reject a registrant's payment. Destructive: the row is deleted.
async fn reject(
    AuthAdmin(admin): AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TransitionResponse>> {
    let outcome = state
        .verification_service
        .transition(&id, &admin.id, RegistrationStatus::Rejected, "REJECT_PAYMENT")
        .await?;
    Ok(Json(outcome.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/registrants", get(list_registrants))
        .route("/stats", get(stats))
        .route("/registrants/{id}/claim", post(claim))
        .route("/registrants/{id}/approve", post(approve))
        .route("/registrants/{id}/reject", post(reject))
}
