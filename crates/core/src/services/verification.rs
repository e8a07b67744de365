//! Status transition engine for the approval lifecycle.
//!
//! Legal transitions: `PENDING → VERIFYING → {APPROVED, REJECTED}`, plus the
//! direct `PENDING → {APPROVED, REJECTED}` shortcut. `APPROVED` is terminal;
//! `REJECTED` deletes the row, so neither state transitions further.

use sea_orm::Set;
use techsprint_common::{AppError, AppResult, IdGenerator};
use techsprint_db::{
    entities::{
        notification_outbox,
        notification_outbox::NotificationKind,
        registrant,
        registrant::RegistrationStatus,
    },
    repositories::{ActionLogRepository, NotificationOutboxRepository, RegistrantRepository},
};

use crate::services::events::{EventPublisher, RegistrantEvent};

/// Result of a transition request.
#[derive(Debug)]
pub enum TransitionOutcome {
    /// The transition was applied; the updated row is returned.
    /// For rejections the row has already been removed from the live table.
    Applied(registrant::Model),
    /// Another admin got there first. Informational, not an error: nothing
    /// was logged and no notification was queued.
    AlreadyHandled,
}

/// Status transition engine.
#[derive(Clone)]
pub struct VerificationService {
    registrant_repo: RegistrantRepository,
    log_repo: ActionLogRepository,
    outbox_repo: NotificationOutboxRepository,
    events: EventPublisher,
    id_gen: IdGenerator,
}

impl VerificationService {
    /// Create a new verification service.
    #[must_use]
    pub const fn new(
        registrant_repo: RegistrantRepository,
        log_repo: ActionLogRepository,
        outbox_repo: NotificationOutboxRepository,
        events: EventPublisher,
    ) -> Self {
        Self {
            registrant_repo,
            log_repo,
            outbox_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// Transition a registrant to `VERIFYING`, `APPROVED` or `REJECTED`.
    ///
    /// The update is a compare-and-swap: claiming `VERIFYING` requires the
    /// row to be `PENDING` and unclaimed; finalizing requires `PENDING` or
    /// `VERIFYING`. A swap that matches no row while the row still exists
    /// means another admin already handled it — reported as
    /// [`TransitionOutcome::AlreadyHandled`] with no log entry and no
    /// notification intent left pending.
    ///
    /// For `APPROVED`/`REJECTED` a notification intent is persisted before
    /// the swap, so a crash between the swap and the dispatcher leaves a
    /// replayable record rather than a silently lost email. `REJECTED`
    /// additionally hard-deletes the row; only the action log and the
    /// intent's snapshot survive.
    pub async fn transition(
        &self,
        registrant_id: &str,
        admin_id: &str,
        target: RegistrationStatus,
        action_tag: &str,
    ) -> AppResult<TransitionOutcome> {
        if target == RegistrationStatus::Pending {
            return Err(AppError::BadRequest(
                "Cannot transition back to PENDING".to_string(),
            ));
        }

        // Snapshot for the notification intent; also surfaces NotFound early.
        let row = self.registrant_repo.get_by_id(registrant_id).await?;

        let intent_id = match target {
            RegistrationStatus::Approved => Some(
                self.enqueue_intent(&row, NotificationKind::Approval).await?,
            ),
            RegistrationStatus::Rejected => Some(
                self.enqueue_intent(&row, NotificationKind::Rejection).await?,
            ),
            _ => None,
        };

        let swap = match target {
            RegistrationStatus::Verifying => {
                self.registrant_repo
                    .claim_verifying(registrant_id, admin_id)
                    .await
            }
            _ => {
                self.registrant_repo
                    .finalize_status(registrant_id, target)
                    .await
            }
        };

        let rows_affected = match swap {
            Ok(n) => n,
            Err(e) => {
                // Aborted transition: the intent must not outlive it, or the
                // dispatcher would email for a change that never happened.
                self.cancel_intent(intent_id.as_deref()).await;
                return Err(e);
            }
        };

        if rows_affected == 0 {
            self.cancel_intent(intent_id.as_deref()).await;
            tracing::debug!(
                registrant_id = registrant_id,
                admin_id = admin_id,
                to_status = ?target,
                "Transition no-op: already handled by another admin"
            );
            return Ok(TransitionOutcome::AlreadyHandled);
        }

        // The transition is committed; the log write must not undo it.
        let log = techsprint_db::entities::action_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            registrant_id: Set(Some(registrant_id.to_string())),
            admin_id: Set(admin_id.to_string()),
            action: Set(action_tag.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        if let Err(e) = self.log_repo.create(log).await {
            tracing::warn!(
                registrant_id = registrant_id,
                action = action_tag,
                error = %e,
                "Action log write failed after committed transition"
            );
        }

        let updated = self.registrant_repo.get_by_id(registrant_id).await?;

        if target == RegistrationStatus::Rejected {
            // Rejection leaves no trace in the live table.
            self.registrant_repo.delete_by_id(registrant_id).await?;
            self.events.publish(RegistrantEvent::Deleted {
                id: registrant_id.to_string(),
            });
        } else {
            self.events.publish(RegistrantEvent::StatusChanged {
                id: registrant_id.to_string(),
                status: sea_orm::ActiveEnum::to_value(&target),
            });
        }

        tracing::info!(
            registrant_id = registrant_id,
            admin_id = admin_id,
            to_status = ?target,
            "Registrant transition applied"
        );

        Ok(TransitionOutcome::Applied(updated))
    }

    async fn cancel_intent(&self, intent_id: Option<&str>) {
        if let Some(intent_id) = intent_id {
            if let Err(e) = self.outbox_repo.mark_cancelled(intent_id).await {
                tracing::warn!(intent_id = %intent_id, error = %e, "Failed to cancel notification intent");
            }
        }
    }

    async fn enqueue_intent(
        &self,
        row: &registrant::Model,
        kind: NotificationKind,
    ) -> AppResult<String> {
        let id = self.id_gen.generate();
        let intent = notification_outbox::ActiveModel {
            id: Set(id.clone()),
            registrant_id: Set(Some(row.id.clone())),
            kind: Set(kind),
            recipient_email: Set(row.email.clone()),
            recipient_name: Set(row.name.clone()),
            college: Set(row.college.clone()),
            status: Set(notification_outbox::OutboxStatus::Pending),
            attempts: Set(0),
            last_error: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            processed_at: Set(None),
        };
        self.outbox_repo.create(intent).await?;
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use techsprint_db::entities::action_log;

    fn registrant_row(id: &str, status: RegistrationStatus) -> registrant::Model {
        registrant::Model {
            id: id.to_string(),
            reg_no: format!("REG-{id}"),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            college: "RGM College".to_string(),
            branch: Some("CSE".to_string()),
            transaction_id: "UTR12345".to_string(),
            screenshot_url: "/files/proof.jpg".to_string(),
            assigned_qr_id: "qr1".to_string(),
            status,
            verified_by: None,
            created_at: Utc::now().into(),
        }
    }

    fn outbox_row(id: &str, kind: NotificationKind) -> notification_outbox::Model {
        notification_outbox::Model {
            id: id.to_string(),
            registrant_id: Some("reg1".to_string()),
            kind,
            recipient_email: "asha@example.com".to_string(),
            recipient_name: "Asha Rao".to_string(),
            college: "RGM College".to_string(),
            status: notification_outbox::OutboxStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Utc::now().into(),
            processed_at: None,
        }
    }

    fn log_row() -> action_log::Model {
        action_log::Model {
            id: "log1".to_string(),
            registrant_id: Some("reg1".to_string()),
            admin_id: "admin1".to_string(),
            action: "APPROVE_PAYMENT".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service(
        registrant_db: Arc<sea_orm::DatabaseConnection>,
        log_db: Arc<sea_orm::DatabaseConnection>,
        outbox_db: Arc<sea_orm::DatabaseConnection>,
    ) -> VerificationService {
        VerificationService::new(
            RegistrantRepository::new(registrant_db),
            ActionLogRepository::new(log_db),
            NotificationOutboxRepository::new(outbox_db),
            EventPublisher::new(),
        )
    }

    #[tokio::test]
    async fn test_transition_to_pending_is_rejected() {
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let svc = service(empty(), empty(), empty());

        let result = svc
            .transition("reg1", "admin1", RegistrationStatus::Pending, "NOOP")
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_approve_applies_and_logs() {
        let registrant_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // pre-CAS fetch, CAS, post-CAS fetch
                .append_query_results([[registrant_row("reg1", RegistrationStatus::Pending)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[registrant_row("reg1", RegistrationStatus::Approved)]])
                .into_connection(),
        );
        let log_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[log_row()]])
                .into_connection(),
        );
        let outbox_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[outbox_row("ob1", NotificationKind::Approval)]])
                .into_connection(),
        );

        let svc = service(registrant_db, log_db, outbox_db);
        let outcome = svc
            .transition("reg1", "admin1", RegistrationStatus::Approved, "APPROVE_PAYMENT")
            .await
            .unwrap();

        match outcome {
            TransitionOutcome::Applied(row) => {
                assert_eq!(row.status, RegistrationStatus::Approved);
            }
            TransitionOutcome::AlreadyHandled => panic!("Expected Applied"),
        }
    }

    #[tokio::test]
    async fn test_second_approve_is_already_handled() {
        let registrant_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[registrant_row("reg1", RegistrationStatus::Approved)]])
                // CAS matches nothing: the row is already APPROVED
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        // No log result prepared: a log write here would error, and the
        // outcome below proves none was attempted before returning
        let log_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let outbox_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[outbox_row("ob1", NotificationKind::Approval)]])
                // cancel of the now-moot intent
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let svc = service(registrant_db, log_db, outbox_db);
        let outcome = svc
            .transition("reg1", "admin1", RegistrationStatus::Approved, "APPROVE_PAYMENT")
            .await
            .unwrap();

        assert!(matches!(outcome, TransitionOutcome::AlreadyHandled));
    }

    #[tokio::test]
    async fn test_reject_deletes_the_row() {
        let registrant_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[registrant_row("reg1", RegistrationStatus::Verifying)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[registrant_row("reg1", RegistrationStatus::Rejected)]])
                // the hard delete
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let log_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[action_log::Model {
                    action: "REJECT_PAYMENT".to_string(),
                    ..log_row()
                }]])
                .into_connection(),
        );
        let outbox_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[outbox_row("ob1", NotificationKind::Rejection)]])
                .into_connection(),
        );

        let svc = service(registrant_db, log_db, outbox_db);
        let outcome = svc
            .transition("reg1", "admin1", RegistrationStatus::Rejected, "REJECT_PAYMENT")
            .await
            .unwrap();

        match outcome {
            TransitionOutcome::Applied(row) => {
                assert_eq!(row.status, RegistrationStatus::Rejected);
            }
            TransitionOutcome::AlreadyHandled => panic!("Expected Applied"),
        }
    }

    #[tokio::test]
    async fn test_store_error_during_swap_cancels_intent() {
        let registrant_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[registrant_row("reg1", RegistrationStatus::Pending)]])
                // No exec results prepared: the CAS update errors out
                .into_connection(),
        );
        let log_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let outbox_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[outbox_row("ob1", NotificationKind::Approval)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let svc = service(registrant_db, log_db, outbox_db);
        let result = svc
            .transition("reg1", "admin1", RegistrationStatus::Approved, "APPROVE_PAYMENT")
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_transition_missing_registrant_is_not_found() {
        let registrant_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<registrant::Model>::new()])
                .into_connection(),
        );
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let svc = service(registrant_db, empty(), empty());
        let result = svc
            .transition("ghost", "admin1", RegistrationStatus::Approved, "APPROVE_PAYMENT")
            .await;

        assert!(matches!(result, Err(AppError::RegistrantNotFound(_))));
    }

    #[tokio::test]
    async fn test_claim_verifying_no_intent_enqueued() {
        let registrant_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[registrant_row("reg1", RegistrationStatus::Pending)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[registrant_row("reg1", RegistrationStatus::Verifying)]])
                .into_connection(),
        );
        let log_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[action_log::Model {
                    action: "START_VERIFICATION".to_string(),
                    ..log_row()
                }]])
                .into_connection(),
        );
        // No outbox results prepared: an intent insert would error the call
        let outbox_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let svc = service(registrant_db, log_db, outbox_db);
        let outcome = svc
            .transition("reg1", "admin1", RegistrationStatus::Verifying, "START_VERIFICATION")
            .await
            .unwrap();

        assert!(matches!(outcome, TransitionOutcome::Applied(_)));
    }
}
