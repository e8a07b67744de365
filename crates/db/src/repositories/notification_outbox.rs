//! Notification outbox repository.

use std::sync::Arc;

use crate::entities::{notification_outbox, notification_outbox::OutboxStatus, NotificationOutbox};
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use techsprint_common::{AppError, AppResult};

/// Notification outbox repository for database operations.
#[derive(Clone)]
pub struct NotificationOutboxRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationOutboxRepository {
    /// Create a new outbox repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Persist a new intent.
    pub async fn create(
        &self,
        model: notification_outbox::ActiveModel,
    ) -> AppResult<notification_outbox::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch pending intents, oldest first.
    pub async fn find_pending(&self, limit: u64) -> AppResult<Vec<notification_outbox::Model>> {
        NotificationOutbox::find()
            .filter(notification_outbox::Column::Status.eq(OutboxStatus::Pending))
            .order_by_asc(notification_outbox::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark an intent as delivered.
    pub async fn mark_sent(&self, id: &str, processed_at: DateTime<Utc>) -> AppResult<()> {
        NotificationOutbox::update_many()
            .col_expr(
                notification_outbox::Column::Status,
                Expr::value(OutboxStatus::Sent),
            )
            .col_expr(
                notification_outbox::Column::ProcessedAt,
                Expr::value(Some(processed_at)),
            )
            .filter(notification_outbox::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Mark an intent as cancelled (its transition was a no-op).
    pub async fn mark_cancelled(&self, id: &str) -> AppResult<()> {
        NotificationOutbox::update_many()
            .col_expr(
                notification_outbox::Column::Status,
                Expr::value(OutboxStatus::Cancelled),
            )
            .filter(notification_outbox::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Record a failed delivery attempt.
    ///
    /// Keeps the intent pending while attempts remain; marks it failed with
    /// `processed_at` set once `terminal` is true.
    pub async fn record_attempt(
        &self,
        id: &str,
        attempts: i32,
        error: &str,
        terminal: bool,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut update = NotificationOutbox::update_many()
            .col_expr(notification_outbox::Column::Attempts, Expr::value(attempts))
            .col_expr(
                notification_outbox::Column::LastError,
                Expr::value(Some(error.to_string())),
            );

        if terminal {
            update = update
                .col_expr(
                    notification_outbox::Column::Status,
                    Expr::value(OutboxStatus::Failed),
                )
                .col_expr(
                    notification_outbox::Column::ProcessedAt,
                    Expr::value(Some(now)),
                );
        }

        update
            .filter(notification_outbox::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
