//! Action log repository.

use std::sync::Arc;

use crate::entities::{action_log, ActionLog};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use techsprint_common::{AppError, AppResult};

/// Action log repository. Append-only: no update or delete operations.
#[derive(Clone)]
pub struct ActionLogRepository {
    db: Arc<DatabaseConnection>,
}

impl ActionLogRepository {
    /// Create a new action log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a log entry.
    pub async fn create(&self, model: action_log::ActiveModel) -> AppResult<action_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List entries, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<action_log::Model>> {
        ActionLog::find()
            .order_by_desc(action_log::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List entries referencing a registrant, oldest first.
    pub async fn find_by_registrant(
        &self,
        registrant_id: &str,
    ) -> AppResult<Vec<action_log::Model>> {
        ActionLog::find()
            .filter(action_log::Column::RegistrantId.eq(registrant_id))
            .order_by_asc(action_log::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
