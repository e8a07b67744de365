//! Email account repository.

use std::sync::Arc;

use crate::entities::{email_account, EmailAccount};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use techsprint_common::{AppError, AppResult};

/// Email account repository for database operations.
#[derive(Clone)]
pub struct EmailAccountRepository {
    db: Arc<DatabaseConnection>,
}

impl EmailAccountRepository {
    /// Create a new email account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List active accounts in creation order.
    ///
    /// This order is the fallback order: the dispatcher tries each account
    /// in turn until one send succeeds.
    pub async fn list_active(&self) -> AppResult<Vec<email_account::Model>> {
        EmailAccount::find()
            .filter(email_account::Column::Active.eq(true))
            .order_by_asc(email_account::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all accounts in creation order.
    pub async fn list(&self) -> AppResult<Vec<email_account::Model>> {
        EmailAccount::find()
            .order_by_asc(email_account::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<email_account::Model> {
        EmailAccount::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Email account {id}")))
    }

    /// Create a new account.
    pub async fn create(&self, model: email_account::ActiveModel) -> AppResult<email_account::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an account.
    pub async fn update(&self, model: email_account::ActiveModel) -> AppResult<email_account::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an account.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<u64> {
        let result = EmailAccount::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
