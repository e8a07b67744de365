//! Payment QR assignment and pool management.

use sea_orm::Set;
use techsprint_common::{AppError, AppResult, IdGenerator};
use techsprint_db::{entities::qr_code, repositories::QrCodeRepository};

/// QR code service: assignment for registrants, pool management for the
/// main admin.
#[derive(Clone)]
pub struct QrService {
    qr_repo: QrCodeRepository,
    id_gen: IdGenerator,
}

/// Input for creating a QR code.
pub struct CreateQrInput {
    pub upi_id: String,
    pub qr_image_url: String,
    pub daily_limit: i32,
}

impl QrService {
    /// Create a new QR service.
    #[must_use]
    pub const fn new(qr_repo: QrCodeRepository) -> Self {
        Self {
            qr_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Assign the least-utilized active QR code.
    ///
    /// Selection only: the usage counter is incremented at submission time,
    /// not here, so several registrants may be shown the same code before
    /// any of them submits. That race is accepted.
    pub async fn assign(&self) -> AppResult<qr_code::Model> {
        self.qr_repo
            .find_least_used_active()
            .await?
            .ok_or(AppError::NoCapacity)
    }

    /// Create a new QR code (main admin).
    pub async fn create(&self, input: CreateQrInput) -> AppResult<qr_code::Model> {
        let upi_id = input.upi_id.trim();
        if upi_id.is_empty() {
            return Err(AppError::BadRequest("UPI ID is required".to_string()));
        }
        if input.qr_image_url.trim().is_empty() {
            return Err(AppError::BadRequest("QR image URL is required".to_string()));
        }

        let model = qr_code::ActiveModel {
            id: Set(self.id_gen.generate()),
            upi_id: Set(upi_id.to_string()),
            qr_image_url: Set(input.qr_image_url.trim().to_string()),
            daily_limit: Set(input.daily_limit),
            today_usage: Set(0),
            active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.qr_repo.create(model).await
    }

    /// List the full pool (main admin).
    pub async fn list(&self) -> AppResult<Vec<qr_code::Model>> {
        self.qr_repo.list().await
    }

    /// Activate or deactivate a QR code (main admin).
    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<()> {
        // Existence check first so a bad id surfaces as 404, not a no-op
        self.qr_repo.get_by_id(id).await?;
        self.qr_repo.set_active(id, active).await
    }

    /// Delete a QR code (main admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.qr_repo.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("QR code {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn qr(id: &str, usage: i32, active: bool) -> qr_code::Model {
        qr_code::Model {
            id: id.to_string(),
            upi_id: format!("{id}@upi"),
            qr_image_url: format!("https://cdn.example.com/{id}.png"),
            daily_limit: 100,
            today_usage: usage,
            active,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_assign_returns_least_used() {
        // The query orders by today_usage ascending and limits to one row;
        // the store hands back the winner.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[qr("qr_b", 2, true)]])
                .into_connection(),
        );
        let service = QrService::new(QrCodeRepository::new(db));

        let selected = service.assign().await.unwrap();
        assert_eq!(selected.id, "qr_b");
        assert_eq!(selected.today_usage, 2);
    }

    #[tokio::test]
    async fn test_assign_no_capacity() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<qr_code::Model>::new()])
                .into_connection(),
        );
        let service = QrService::new(QrCodeRepository::new(db));

        match service.assign().await {
            Err(AppError::NoCapacity) => {}
            other => panic!("Expected NoCapacity, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_requires_upi_id() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = QrService::new(QrCodeRepository::new(db));

        let result = service
            .create(CreateQrInput {
                upi_id: "   ".to_string(),
                qr_image_url: "https://cdn.example.com/qr.png".to_string(),
                daily_limit: 50,
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
