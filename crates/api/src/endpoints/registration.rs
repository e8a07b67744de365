//! Public registration endpoints.

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use techsprint_common::{AppError, AppResult};
use techsprint_db::entities::registrant;
use techsprint_core::{RegistrationInput, ScreenshotUpload};

use crate::{middleware::AppState, response::ApiResponse};

/// Payment QR shown during the payment step.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQrResponse {
    pub id: String,
    pub upi_id: String,
    pub qr_image_url: String,
}

/// Pick the payment QR for a new registrant.
async fn payment_qr(State(state): State<AppState>) -> AppResult<ApiResponse<PaymentQrResponse>> {
    let qr = state.qr_service.assign().await?;

    Ok(ApiResponse::ok(PaymentQrResponse {
        id: qr.id,
        upi_id: qr.upi_id,
        qr_image_url: qr.qr_image_url,
    }))
}

/// Registrant as acknowledged to the public flow.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantAck {
    pub id: String,
    pub reg_no: String,
    pub name: String,
    pub status: registrant::RegistrationStatus,
}

impl From<registrant::Model> for RegistrantAck {
    fn from(model: registrant::Model) -> Self {
        Self {
            id: model.id,
            reg_no: model.reg_no,
            name: model.name,
            status: model.status,
        }
    }
}

/// Submit a registration: form fields plus the payment screenshot.
async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<RegistrantAck>> {
    let mut name = String::new();
    let mut reg_no = String::new();
    let mut email = String::new();
    let mut phone = String::new();
    let mut college = String::new();
    let mut other_college = None;
    let mut branch = None;
    let mut transaction_id = String::new();
    let mut assigned_qr_id = String::new();
    let mut screenshot = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed form data: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name == "screenshot" {
            let filename = field.file_name().unwrap_or("screenshot").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Screenshot read failed: {e}")))?;
            screenshot = Some(ScreenshotUpload {
                filename,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed form data: {e}")))?;

        match field_name.as_str() {
            "name" => name = value,
            "reg_no" => reg_no = value,
            "email" => email = value,
            "phone" => phone = value,
            "college" => college = value,
            "other_college" => other_college = Some(value),
            "branch" => branch = Some(value),
            "transaction_id" => transaction_id = value,
            "assigned_qr_id" => assigned_qr_id = value,
            _ => {}
        }
    }

    let screenshot = screenshot
        .ok_or_else(|| AppError::Validation("Payment screenshot is required".to_string()))?;

    let input = RegistrationInput {
        name,
        reg_no,
        email,
        phone,
        college,
        other_college,
        branch,
        transaction_id,
        assigned_qr_id,
    };

    let created = state.registration_service.submit(input, screenshot).await?;
    Ok(ApiResponse::ok(created.into()))
}

/// Look up a submission for the acknowledgment screen.
async fn status(
    State(state): State<AppState>,
    Path(reg_no): Path<String>,
) -> AppResult<ApiResponse<RegistrantAck>> {
    let registrant = state
        .registration_service
        .find_by_reg_no(&reg_no)
        .await?
        .ok_or_else(|| AppError::RegistrantNotFound(reg_no))?;

    Ok(ApiResponse::ok(registrant.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/qr", get(payment_qr))
        .route("/", post(submit))
        .route("/status/{reg_no}", get(status))
}
