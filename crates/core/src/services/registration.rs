//! Registration submission service.

use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use techsprint_common::{
    storage::generate_storage_key, AppError, AppResult, IdGenerator, StorageBackend,
};
use techsprint_db::{
    entities::{registrant, registrant::RegistrationStatus},
    repositories::{QrCodeRepository, RegistrantRepository},
};
use validator::Validate;

use crate::services::events::{EventPublisher, RegistrantEvent};

/// Basic `local@domain.tld` shape.
#[allow(clippy::unwrap_used)]
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Sentinel selection for "my college is not listed".
const OTHERS: &str = "OTHERS";

/// Uploaded payment screenshot.
pub struct ScreenshotUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Input for a registration submission.
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrationInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(min = 3, max = 64))]
    pub reg_no: String,

    #[validate(length(max = 256))]
    pub email: String,

    #[validate(length(min = 10, max = 32))]
    pub phone: String,

    /// College selection; `OTHERS` requires `other_college`.
    #[validate(length(min = 1, max = 256))]
    pub college: String,

    /// Custom college name when `college` is `OTHERS`.
    pub other_college: Option<String>,

    #[validate(length(max = 128))]
    pub branch: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub transaction_id: String,

    /// QR code shown to the registrant during the payment step.
    pub assigned_qr_id: String,
}

impl RegistrationInput {
    /// The college string that ends up on the row.
    fn effective_college(&self) -> AppResult<String> {
        if self.college.trim().eq_ignore_ascii_case(OTHERS) {
            let other = self
                .other_college
                .as_deref()
                .map(str::trim)
                .unwrap_or_default();
            if other.is_empty() {
                return Err(AppError::Validation(
                    "College name is required when selecting Others".to_string(),
                ));
            }
            Ok(other.to_string())
        } else {
            Ok(self.college.trim().to_string())
        }
    }
}

/// Registration counters for the dashboards.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
}

/// Registration submission service.
#[derive(Clone)]
pub struct RegistrationService {
    registrant_repo: RegistrantRepository,
    qr_repo: QrCodeRepository,
    storage: std::sync::Arc<dyn StorageBackend>,
    events: EventPublisher,
    id_gen: IdGenerator,
}

impl RegistrationService {
    /// Create a new registration service.
    pub fn new(
        registrant_repo: RegistrantRepository,
        qr_repo: QrCodeRepository,
        storage: std::sync::Arc<dyn StorageBackend>,
        events: EventPublisher,
    ) -> Self {
        Self {
            registrant_repo,
            qr_repo,
            storage,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a registration.
    ///
    /// Uploads the screenshot first (failure aborts before any row exists),
    /// inserts the registrant as `PENDING`, then bumps the assigned QR's
    /// usage counter. The counter bump is best-effort: its failure is logged
    /// but does not roll back the insert.
    pub async fn submit(
        &self,
        input: RegistrationInput,
        screenshot: ScreenshotUpload,
    ) -> AppResult<registrant::Model> {
        input.validate()?;
        let college = input.effective_college()?;

        if !EMAIL_RE.is_match(input.email.trim()) {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }

        let digits = input.phone.chars().filter(char::is_ascii_digit).count();
        if digits < 10 {
            return Err(AppError::Validation(
                "Phone number must have at least 10 digits".to_string(),
            ));
        }

        if screenshot.data.is_empty() {
            return Err(AppError::Validation(
                "Payment screenshot is required".to_string(),
            ));
        }

        if let Some(existing) = self.registrant_repo.find_by_reg_no(input.reg_no.trim()).await? {
            return Err(AppError::Conflict(format!(
                "Registration number {} already submitted",
                existing.reg_no
            )));
        }

        let key = generate_storage_key(input.reg_no.trim(), &screenshot.filename);
        let uploaded = self
            .storage
            .upload(&key, &screenshot.data, &screenshot.content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Screenshot upload failed: {e}")))?;

        let id = self.id_gen.generate();
        let model = registrant::ActiveModel {
            id: Set(id.clone()),
            reg_no: Set(input.reg_no.trim().to_string()),
            name: Set(input.name.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            phone: Set(input.phone.trim().to_string()),
            college: Set(college),
            branch: Set(input.branch.map(|b| b.trim().to_string()).filter(|b| !b.is_empty())),
            transaction_id: Set(input.transaction_id.trim().to_string()),
            screenshot_url: Set(uploaded.url),
            assigned_qr_id: Set(input.assigned_qr_id.clone()),
            status: Set(RegistrationStatus::Pending),
            verified_by: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.registrant_repo.create(model).await?;

        // Exactly one bump per successful submission; drift on failure is
        // accepted and observable through this log line.
        if let Err(e) = self.qr_repo.increment_usage(&input.assigned_qr_id).await {
            tracing::warn!(
                qr_id = %input.assigned_qr_id,
                error = %e,
                "QR usage increment failed after registrant insert"
            );
        }

        self.events.publish(RegistrantEvent::Created {
            id: created.id.clone(),
        });

        Ok(created)
    }

    /// Look up a registrant by registration number (acknowledgment screen).
    pub async fn find_by_reg_no(&self, reg_no: &str) -> AppResult<Option<registrant::Model>> {
        self.registrant_repo.find_by_reg_no(reg_no).await
    }

    /// List registrants for the consoles: `PENDING` first, then by
    /// submission time, newest first.
    pub async fn list_for_review(&self) -> AppResult<Vec<registrant::Model>> {
        let mut rows = self.registrant_repo.list().await?;
        rows.sort_by_key(|r| status_rank(r.status));
        Ok(rows)
    }

    /// Registration counters for the dashboards.
    pub async fn stats(&self) -> AppResult<RegistrationStats> {
        Ok(RegistrationStats {
            total: self.registrant_repo.count().await?,
            pending: self
                .registrant_repo
                .count_by_status(RegistrationStatus::Pending)
                .await?,
            approved: self
                .registrant_repo
                .count_by_status(RegistrationStatus::Approved)
                .await?,
        })
    }

    /// Edit contact details (main admin console).
    pub async fn update_contact(
        &self,
        id: &str,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        college: Option<String>,
        branch: Option<String>,
    ) -> AppResult<registrant::Model> {
        let row = self.registrant_repo.get_by_id(id).await?;
        let mut active: registrant::ActiveModel = row.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            if !EMAIL_RE.is_match(email.trim()) {
                return Err(AppError::Validation("Invalid email address".to_string()));
            }
            active.email = Set(email.trim().to_string());
        }
        if let Some(phone) = phone {
            active.phone = Set(phone);
        }
        if let Some(college) = college {
            active.college = Set(college);
        }
        if let Some(branch) = branch {
            active.branch = Set(Some(branch).filter(|b| !b.is_empty()));
        }

        self.registrant_repo.update(active).await
    }

    /// Manually delete a registrant (main admin console).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.registrant_repo.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::RegistrantNotFound(id.to_string()));
        }
        self.events.publish(RegistrantEvent::Deleted { id: id.to_string() });
        Ok(())
    }
}

/// Review order: open work first.
const fn status_rank(status: RegistrationStatus) -> u8 {
    match status {
        RegistrationStatus::Pending => 0,
        RegistrationStatus::Verifying => 1,
        RegistrationStatus::Approved => 2,
        RegistrationStatus::Rejected => 3,
    }
}
