//! Group link repository.

use std::sync::Arc;

use crate::entities::{group_link, group_link::CollegeGroup, GroupLink};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use techsprint_common::{AppError, AppResult};

/// Group link repository for database operations.
#[derive(Clone)]
pub struct GroupLinkRepository {
    db: Arc<DatabaseConnection>,
}

impl GroupLinkRepository {
    /// Create a new group link repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the first active link for a college classification.
    pub async fn find_active_by_college(
        &self,
        college: CollegeGroup,
    ) -> AppResult<Option<group_link::Model>> {
        GroupLink::find()
            .filter(group_link::Column::College.eq(college))
            .filter(group_link::Column::Active.eq(true))
            .order_by_asc(group_link::Column::CreatedAt)
            .limit(1)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all links in creation order.
    pub async fn list(&self) -> AppResult<Vec<group_link::Model>> {
        GroupLink::find()
            .order_by_asc(group_link::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a link by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<group_link::Model> {
        GroupLink::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Group link {id}")))
    }

    /// Create a new link.
    pub async fn create(&self, model: group_link::ActiveModel) -> AppResult<group_link::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a link.
    pub async fn update(&self, model: group_link::ActiveModel) -> AppResult<group_link::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a link.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<u64> {
        let result = GroupLink::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
