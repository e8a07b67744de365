//! Append-only audit trail.

use sea_orm::Set;
use techsprint_common::{AppResult, IdGenerator};
use techsprint_db::{entities::action_log, repositories::ActionLogRepository};

/// Action log service. Append and read only; entries are never mutated.
#[derive(Clone)]
pub struct ActionLogService {
    log_repo: ActionLogRepository,
    id_gen: IdGenerator,
}

impl ActionLogService {
    /// Create a new action log service.
    #[must_use]
    pub const fn new(log_repo: ActionLogRepository) -> Self {
        Self {
            log_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append an entry.
    pub async fn append(
        &self,
        registrant_id: Option<&str>,
        admin_id: &str,
        action: &str,
    ) -> AppResult<action_log::Model> {
        let model = action_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            registrant_id: Set(registrant_id.map(String::from)),
            admin_id: Set(admin_id.to_string()),
            action: Set(action.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.log_repo.create(model).await
    }

    /// List entries, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<action_log::Model>> {
        self.log_repo.list(limit, offset).await
    }

    /// List entries for one registrant, oldest first.
    pub async fn for_registrant(&self, registrant_id: &str) -> AppResult<Vec<action_log::Model>> {
        self.log_repo.find_by_registrant(registrant_id).await
    }
}
