//! Management console endpoints (main admin only).

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use techsprint_common::AppResult;
use techsprint_db::entities::{action_log, admin, email_account, group_link, qr_code};
use techsprint_db::entities::{admin::AdminRole, group_link::CollegeGroup};
use techsprint_core::{CreateAdminInput, CreateEmailAccountInput, CreateQrInput};

use crate::{extractors::MainAdmin, middleware::AppState, response::ApiResponse};

// ========== QR pool ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateQrRequest {
    upi_id: String,
    qr_image_url: String,
    #[serde(default)]
    daily_limit: i32,
}

async fn list_qr_codes(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<qr_code::Model>>> {
    Ok(ApiResponse::ok(state.qr_service.list().await?))
}

async fn create_qr_code(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateQrRequest>,
) -> AppResult<ApiResponse<qr_code::Model>> {
    let created = state
        .qr_service
        .create(CreateQrInput {
            upi_id: req.upi_id,
            qr_image_url: req.qr_image_url,
            daily_limit: req.daily_limit,
        })
        .await?;
    Ok(ApiResponse::ok(created))
}

#[derive(Debug, Deserialize)]
struct SetActiveRequest {
    active: bool,
}

async fn set_qr_active(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.qr_service.set_active(&id, req.active).await?;
    Ok(crate::response::ok())
}

async fn delete_qr_code(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.qr_service.delete(&id).await?;
    Ok(crate::response::ok())
}

// ========== Sub-admin accounts ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAdminRequest {
    username: String,
    password: String,
    role: AdminRole,
}

async fn list_admins(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<admin::Model>>> {
    Ok(ApiResponse::ok(state.admin_service.list().await?))
}

async fn create_admin(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateAdminRequest>,
) -> AppResult<ApiResponse<admin::Model>> {
    let created = state
        .admin_service
        .create(CreateAdminInput {
            username: req.username,
            password: req.password,
            role: req.role,
        })
        .await?;
    Ok(ApiResponse::ok(created))
}

async fn set_admin_active(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> AppResult<ApiResponse<admin::Model>> {
    Ok(ApiResponse::ok(
        state.admin_service.set_active(&id, req.active).await?,
    ))
}

async fn delete_admin(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.admin_service.delete(&id).await?;
    Ok(crate::response::ok())
}

// ========== Email accounts ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEmailAccountRequest {
    email_address: String,
    smtp_host: String,
    smtp_port: i32,
    app_password: String,
}

async fn list_email_accounts(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<email_account::Model>>> {
    Ok(ApiResponse::ok(state.email_account_service.list().await?))
}

async fn create_email_account(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateEmailAccountRequest>,
) -> AppResult<ApiResponse<email_account::Model>> {
    let created = state
        .email_account_service
        .create(CreateEmailAccountInput {
            email_address: req.email_address,
            smtp_host: req.smtp_host,
            smtp_port: req.smtp_port,
            app_password: req.app_password,
        })
        .await?;
    Ok(ApiResponse::ok(created))
}

async fn set_email_account_active(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> AppResult<ApiResponse<email_account::Model>> {
    Ok(ApiResponse::ok(
        state
            .email_account_service
            .set_active(&id, req.active)
            .await?,
    ))
}

async fn delete_email_account(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.email_account_service.delete(&id).await?;
    Ok(crate::response::ok())
}

// ========== Group links ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupLinkRequest {
    college: CollegeGroup,
    whatsapp_link: String,
}

async fn list_group_links(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<group_link::Model>>> {
    Ok(ApiResponse::ok(state.group_link_service.list().await?))
}

async fn create_group_link(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateGroupLinkRequest>,
) -> AppResult<ApiResponse<group_link::Model>> {
    let created = state
        .group_link_service
        .create(req.college, &req.whatsapp_link)
        .await?;
    Ok(ApiResponse::ok(created))
}

async fn set_group_link_active(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> AppResult<ApiResponse<group_link::Model>> {
    Ok(ApiResponse::ok(
        state.group_link_service.set_active(&id, req.active).await?,
    ))
}

async fn delete_group_link(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.group_link_service.delete(&id).await?;
    Ok(crate::response::ok())
}

// ========== Audit log ==========

#[derive(Debug, Deserialize)]
struct LogQuery {
    #[serde(default = "default_log_limit")]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

const fn default_log_limit() -> u64 {
    100
}

async fn list_action_logs(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> AppResult<ApiResponse<Vec<action_log::Model>>> {
    Ok(ApiResponse::ok(
        state
            .action_log_service
            .list(query.limit.min(500), query.offset)
            .await?,
    ))
}

// ========== Registrant management ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRegistrantRequest {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    college: Option<String>,
    branch: Option<String>,
}

async fn update_registrant(
    MainAdmin(_admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRegistrantRequest>,
) -> AppResult<ApiResponse<techsprint_db::entities::registrant::Model>> {
    let updated = state
        .registration_service
        .update_contact(&id, req.name, req.email, req.phone, req.college, req.branch)
        .await?;
    Ok(ApiResponse::ok(updated))
}

async fn delete_registrant(
    MainAdmin(admin): MainAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.registration_service.delete(&id).await?;

    // Manual deletes are audited like every other admin action
    if let Err(e) = state
        .action_log_service
        .append(Some(&id), &admin.id, "DELETE_USER")
        .await
    {
        tracing::warn!(registrant_id = %id, error = %e, "Failed to log manual delete");
    }

    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/qr-codes", get(list_qr_codes).post(create_qr_code))
        .route("/qr-codes/{id}/active", post(set_qr_active))
        .route("/qr-codes/{id}", delete(delete_qr_code))
        .route("/admins", get(list_admins).post(create_admin))
        .route("/admins/{id}/active", post(set_admin_active))
        .route("/admins/{id}", delete(delete_admin))
        .route(
            "/email-accounts",
            get(list_email_accounts).post(create_email_account),
        )
        .route("/email-accounts/{id}/active", post(set_email_account_active))
        .route("/email-accounts/{id}", delete(delete_email_account))
        .route("/group-links", get(list_group_links).post(create_group_link))
        .route("/group-links/{id}/active", post(set_group_link_active))
        .route("/group-links/{id}", delete(delete_group_link))
        .route("/action-logs", get(list_action_logs))
        .route(
            "/registrants/{id}",
            patch(update_registrant).delete(delete_registrant),
        )
}
