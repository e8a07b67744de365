//! QR code repository.

use std::sync::Arc;

use crate::entities::{qr_code, QrCode};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use techsprint_common::{AppError, AppResult};

/// QR code repository for database operations.
#[derive(Clone)]
pub struct QrCodeRepository {
    db: Arc<DatabaseConnection>,
}

impl QrCodeRepository {
    /// Create a new QR code repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the active QR code with the lowest usage today.
    ///
    /// Ties break on creation order, which keeps the selection stable.
    pub async fn find_least_used_active(&self) -> AppResult<Option<qr_code::Model>> {
        QrCode::find()
            .filter(qr_code::Column::Active.eq(true))
            .order_by_asc(qr_code::Column::TodayUsage)
            .order_by_asc(qr_code::Column::CreatedAt)
            .limit(1)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a QR code by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<qr_code::Model>> {
        QrCode::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a QR code by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<qr_code::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("QR code {id}")))
    }

    /// List all QR codes in creation order.
    pub async fn list(&self) -> AppResult<Vec<qr_code::Model>> {
        QrCode::find()
            .order_by_asc(qr_code::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new QR code.
    pub async fn create(&self, model: qr_code::ActiveModel) -> AppResult<qr_code::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a QR code.
    pub async fn update(&self, model: qr_code::ActiveModel) -> AppResult<qr_code::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set the active flag on a QR code.
    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<()> {
        QrCode::update_many()
            .col_expr(qr_code::Column::Active, Expr::value(active))
            .filter(qr_code::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment today's usage atomically (single UPDATE query, no fetch).
    pub async fn increment_usage(&self, id: &str) -> AppResult<()> {
        QrCode::update_many()
            .col_expr(
                qr_code::Column::TodayUsage,
                Expr::col(qr_code::Column::TodayUsage).add(1),
            )
            .filter(qr_code::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a QR code.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<u64> {
        let result = QrCode::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
