//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use techsprint_core::{
    ActionLogService, AdminService, EmailAccountService, EventPublisher, GroupLinkService,
    QrService, RegistrationService, VerificationService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub admin_service: AdminService,
    pub registration_service: RegistrationService,
    pub verification_service: VerificationService,
    pub qr_service: QrService,
    pub group_link_service: GroupLinkService,
    pub email_account_service: EmailAccountService,
    pub action_log_service: ActionLogService,
    pub events: EventPublisher,
}

/// Authentication middleware.
///
/// Resolves the bearer token to an admin row and stashes it in request
/// extensions; the extractors decide whether a given route requires it.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(admin) = state.admin_service.authenticate(token).await
    {
        req.extensions_mut().insert(admin);
    }

    next.run(req).await
}
