//! Notification outbox worker.
//!
//! Drains pending notification intents: resolves the group link for
//! approvals, dispatches through the email fallback chain, and records the
//! outcome. A transition stays committed even when its email permanently
//! fails; the failed intent keeps the aggregated error for inspection.

use std::time::Duration;

use chrono::Utc;
use techsprint_common::AppResult;
use techsprint_db::{
    entities::notification_outbox::{self, NotificationKind},
    repositories::NotificationOutboxRepository,
};

use crate::services::{email::EmailService, group_link::GroupLinkService};

/// Intents drained per poll.
const BATCH_SIZE: u64 = 20;

/// Outbox processor.
#[derive(Clone)]
pub struct OutboxProcessor {
    outbox_repo: NotificationOutboxRepository,
    group_links: GroupLinkService,
    email: EmailService,
    max_attempts: i32,
}

impl OutboxProcessor {
    /// Create a new processor.
    #[must_use]
    pub const fn new(
        outbox_repo: NotificationOutboxRepository,
        group_links: GroupLinkService,
        email: EmailService,
        max_attempts: i32,
    ) -> Self {
        Self {
            outbox_repo,
            group_links,
            email,
            max_attempts,
        }
    }

    /// Drain one batch of pending intents. Returns how many were handled.
    pub async fn process_batch(&self) -> AppResult<usize> {
        let pending = self.outbox_repo.find_pending(BATCH_SIZE).await?;
        let count = pending.len();

        for intent in pending {
            self.process_intent(intent).await;
        }

        Ok(count)
    }

    async fn process_intent(&self, intent: notification_outbox::Model) {
        let result = match intent.kind {
            NotificationKind::Approval => {
                let link = self.group_links.resolve(&intent.college).await;
                if link.is_none() {
                    tracing::warn!(
                        intent_id = %intent.id,
                        college = %intent.college,
                        "No active group link, sending approval without join button"
                    );
                }
                self.email
                    .send_approval(&intent.recipient_email, &intent.recipient_name, link.as_deref())
                    .await
            }
            NotificationKind::Rejection => {
                self.email
                    .send_rejection(&intent.recipient_email, &intent.recipient_name)
                    .await
            }
        };

        match result {
            Ok(()) => {
                if let Err(e) = self.outbox_repo.mark_sent(&intent.id, Utc::now()).await {
                    tracing::error!(intent_id = %intent.id, error = %e, "Failed to mark intent sent");
                }
            }
            Err(e) => {
                let attempts = intent.attempts + 1;
                let terminal = attempts >= self.max_attempts;
                if terminal {
                    tracing::error!(
                        intent_id = %intent.id,
                        attempts = attempts,
                        error = %e,
                        "Notification permanently failed"
                    );
                } else {
                    tracing::warn!(
                        intent_id = %intent.id,
                        attempts = attempts,
                        error = %e,
                        "Notification attempt failed, will retry"
                    );
                }
                if let Err(mark_err) = self
                    .outbox_repo
                    .record_attempt(&intent.id, attempts, &e.to_string(), terminal, Utc::now())
                    .await
                {
                    tracing::error!(intent_id = %intent.id, error = %mark_err, "Failed to record attempt");
                }
            }
        }
    }

    /// Poll loop. Spawn as a background task.
    pub async fn run(self, poll_interval: Duration) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.process_batch().await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(count = n, "Processed notification intents"),
                Err(e) => tracing::error!(error = %e, "Outbox poll failed"),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use techsprint_db::entities::{email_account, group_link, notification_outbox::OutboxStatus};
    use techsprint_db::repositories::{EmailAccountRepository, GroupLinkRepository};

    use crate::services::email::{MailTransport, OutgoingEmail};

    struct CountingTransport {
        sent: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl MailTransport for CountingTransport {
        async fn send(
            &self,
            _account: &email_account::Model,
            _email: &OutgoingEmail,
        ) -> AppResult<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(techsprint_common::AppError::Email("boom".to_string()));
            }
            Ok(())
        }
    }

    fn intent(kind: NotificationKind, attempts: i32) -> notification_outbox::Model {
        notification_outbox::Model {
            id: "ob1".to_string(),
            registrant_id: Some("reg1".to_string()),
            kind,
            recipient_email: "asha@example.com".to_string(),
            recipient_name: "Asha Rao".to_string(),
            college: "RGM College".to_string(),
            status: OutboxStatus::Pending,
            attempts,
            last_error: None,
            created_at: Utc::now().into(),
            processed_at: None,
        }
    }

    fn account() -> email_account::Model {
        email_account::Model {
            id: "acct1".to_string(),
            email_address: "events@example.com".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            app_password: "pw".to_string(),
            active: true,
            created_at: Utc::now().into(),
        }
    }

    fn link() -> group_link::Model {
        group_link::Model {
            id: "lnk1".to_string(),
            college: group_link::CollegeGroup::Rgm,
            whatsapp_link: "https://chat.whatsapp.com/x".to_string(),
            active: true,
            created_at: Utc::now().into(),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn test_approval_intent_sent_and_marked() {
        let outbox_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[intent(NotificationKind::Approval, 0)]])
                .append_exec_results([exec_ok()]) // mark_sent
                .into_connection(),
        );
        let link_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[link()]])
                .into_connection(),
        );
        let account_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[account()]])
                .into_connection(),
        );

        let transport = Arc::new(CountingTransport {
            sent: AtomicUsize::new(0),
            fail: false,
        });

        let processor = OutboxProcessor::new(
            NotificationOutboxRepository::new(outbox_db),
            GroupLinkService::new(GroupLinkRepository::new(link_db), None),
            EmailService::new(
                EmailAccountRepository::new(account_db),
                transport.clone(),
                "TechSprint 2K26".to_string(),
            ),
            3,
        );

        let handled = processor.process_batch().await.unwrap();
        assert_eq!(handled, 1);
        assert_eq!(transport.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_intent_records_attempt() {
        let outbox_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[intent(NotificationKind::Rejection, 2)]])
                .append_exec_results([exec_ok()]) // record_attempt (terminal)
                .into_connection(),
        );
        let link_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let account_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[account()]])
                .into_connection(),
        );

        let transport = Arc::new(CountingTransport {
            sent: AtomicUsize::new(0),
            fail: true,
        });

        let processor = OutboxProcessor::new(
            NotificationOutboxRepository::new(outbox_db),
            GroupLinkService::new(GroupLinkRepository::new(link_db), None),
            EmailService::new(
                EmailAccountRepository::new(account_db),
                transport.clone(),
                "TechSprint 2K26".to_string(),
            ),
            3,
        );

        let handled = processor.process_batch().await.unwrap();
        assert_eq!(handled, 1);
        assert_eq!(transport.sent.load(Ordering::SeqCst), 1);
    }
}
