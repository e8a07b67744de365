//! Registrant repository.

use std::sync::Arc;

use crate::entities::{registrant, registrant::RegistrationStatus, Registrant};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use techsprint_common::{AppError, AppResult};

/// Registrant repository for database operations.
#[derive(Clone)]
pub struct RegistrantRepository {
    db: Arc<DatabaseConnection>,
}

impl RegistrantRepository {
    /// Create a new registrant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a registrant by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<registrant::Model>> {
        Registrant::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a registrant by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<registrant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RegistrantNotFound(id.to_string()))
    }

    /// Find a registrant by registration number.
    pub async fn find_by_reg_no(&self, reg_no: &str) -> AppResult<Option<registrant::Model>> {
        Registrant::find()
            .filter(registrant::Column::RegNo.eq(reg_no))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new registrant.
    pub async fn create(&self, model: registrant::ActiveModel) -> AppResult<registrant::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a registrant (contact-detail edits from the management console).
    pub async fn update(&self, model: registrant::ActiveModel) -> AppResult<registrant::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all registrants, newest first.
    pub async fn list(&self) -> AppResult<Vec<registrant::Model>> {
        Registrant::find()
            .order_by_desc(registrant::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count registrants in a given status.
    pub async fn count_by_status(&self, status: RegistrationStatus) -> AppResult<u64> {
        Registrant::find()
            .filter(registrant::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all registrants.
    pub async fn count(&self) -> AppResult<u64> {
        Registrant::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Claim a registrant for verification.
    ///
    /// Compare-and-swap: succeeds only while the row is still `PENDING` and
    /// unclaimed, so a second admin's claim genuinely fails instead of
    /// silently double-succeeding. Returns the number of rows updated
    /// (0 or 1).
    pub async fn claim_verifying(&self, id: &str, admin_id: &str) -> AppResult<u64> {
        let result = Registrant::update_many()
            .col_expr(
                registrant::Column::Status,
                Expr::value(RegistrationStatus::Verifying),
            )
            .col_expr(
                registrant::Column::VerifiedBy,
                Expr::value(Some(admin_id.to_string())),
            )
            .filter(registrant::Column::Id.eq(id))
            .filter(registrant::Column::Status.eq(RegistrationStatus::Pending))
            .filter(registrant::Column::VerifiedBy.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Finalize a registrant as approved or rejected.
    ///
    /// Compare-and-swap: the prior status must be `PENDING` or `VERIFYING`.
    /// Clears the verification claim. Returns the number of rows updated
    /// (0 or 1).
    pub async fn finalize_status(&self, id: &str, target: RegistrationStatus) -> AppResult<u64> {
        let result = Registrant::update_many()
            .col_expr(registrant::Column::Status, Expr::value(target))
            .col_expr(
                registrant::Column::VerifiedBy,
                Expr::value(Option::<String>::None),
            )
            .filter(registrant::Column::Id.eq(id))
            .filter(
                registrant::Column::Status
                    .is_in([RegistrationStatus::Pending, RegistrationStatus::Verifying]),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Hard-delete a registrant. Returns the number of rows removed.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<u64> {
        let result = Registrant::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
