//! Admin session repository.

use std::sync::Arc;

use crate::entities::{admin_session, AdminSession};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use techsprint_common::{AppError, AppResult};

/// Admin session repository for database operations.
#[derive(Clone)]
pub struct AdminSessionRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminSessionRepository {
    /// Create a new admin session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new session.
    pub async fn create(
        &self,
        model: admin_session::ActiveModel,
    ) -> AppResult<admin_session::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a session by token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<admin_session::Model>> {
        AdminSession::find()
            .filter(admin_session::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a session by token (logout). Returns the number of rows removed.
    pub async fn delete_by_token(&self, token: &str) -> AppResult<u64> {
        let result = AdminSession::delete_many()
            .filter(admin_session::Column::Token.eq(token))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Delete all sessions belonging to an admin.
    pub async fn delete_by_admin(&self, admin_id: &str) -> AppResult<u64> {
        let result = AdminSession::delete_many()
            .filter(admin_session::Column::AdminId.eq(admin_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Delete sessions that expired before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = AdminSession::delete_many()
            .filter(admin_session::Column::ExpiresAt.lt(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
