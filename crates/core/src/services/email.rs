//! Email notification dispatch with account fallback.
//!
//! Outgoing mail goes through a pool of SMTP accounts managed by the main
//! admin. The dispatcher fetches active accounts fresh on every send and
//! tries them in creation order until one delivery succeeds.

use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use sea_orm::Set;
use techsprint_common::{AppError, AppResult, IdGenerator};
use techsprint_db::{entities::email_account, repositories::EmailAccountRepository};

/// A rendered message ready for an SMTP attempt.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    /// Display name on the From header.
    pub from_name: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Transport seam: one delivery attempt through one account.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempt delivery of `email` through `account`.
    async fn send(&self, account: &email_account::Model, email: &OutgoingEmail) -> AppResult<()>;
}

/// SMTP transport via lettre.
pub struct SmtpMailer;

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, account: &email_account::Model, email: &OutgoingEmail) -> AppResult<()> {
        // Port 465 is the implicit-TLS convention; everything else gets a
        // STARTTLS-capable connection.
        let builder = if account.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&account.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&account.smtp_host)
        }
        .map_err(|e| AppError::Email(format!("SMTP setup failed: {e}")))?;

        let port = u16::try_from(account.smtp_port)
            .map_err(|_| AppError::Email(format!("Invalid SMTP port {}", account.smtp_port)))?;

        let transport = builder
            .port(port)
            .credentials(Credentials::new(
                account.email_address.clone(),
                account.app_password.clone(),
            ))
            .build();

        let from = format!("\"{}\" <{}>", email.from_name, account.email_address)
            .parse()
            .map_err(|e| AppError::Email(format!("Invalid sender address: {e}")))?;
        let to = email
            .to
            .parse()
            .map_err(|e| AppError::Email(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| AppError::Email(format!("Failed to build message: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        Ok(())
    }
}

/// Notification dispatcher.
#[derive(Clone)]
pub struct EmailService {
    account_repo: EmailAccountRepository,
    transport: std::sync::Arc<dyn MailTransport>,
    event_name: String,
}

impl EmailService {
    /// Create a new dispatcher.
    pub fn new(
        account_repo: EmailAccountRepository,
        transport: std::sync::Arc<dyn MailTransport>,
        event_name: String,
    ) -> Self {
        Self {
            account_repo,
            transport,
            event_name,
        }
    }

    /// Send the approval email, with the join button when a link is known.
    pub async fn send_approval(
        &self,
        to: &str,
        name: &str,
        group_link: Option<&str>,
    ) -> AppResult<()> {
        let subject = format!("Registration Approved - {}", self.event_name);
        let html = render_approval(name, group_link, &self.event_name);
        self.send_with_fallback(to, &subject, html).await
    }

    /// Send the rejection email.
    pub async fn send_rejection(&self, to: &str, name: &str) -> AppResult<()> {
        let subject = format!("Registration Status - {}", self.event_name);
        let html = render_rejection(name, &self.event_name);
        self.send_with_fallback(to, &subject, html).await
    }

    /// Try each active account in order until one delivery succeeds.
    async fn send_with_fallback(&self, to: &str, subject: &str, html: String) -> AppResult<()> {
        let accounts = self.account_repo.list_active().await?;
        if accounts.is_empty() {
            return Err(AppError::NoActiveAccounts);
        }

        let mut errors = Vec::with_capacity(accounts.len());
        for account in &accounts {
            tracing::info!(
                account = %account.email_address,
                to = to,
                "Attempting email delivery"
            );

            let email = OutgoingEmail {
                from_name: self.event_name.clone(),
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html.clone(),
            };

            match self.transport.send(account, &email).await {
                Ok(()) => {
                    tracing::info!(account = %account.email_address, to = to, "Email sent");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        account = %account.email_address,
                        error = %e,
                        "Email delivery attempt failed, trying next account"
                    );
                    errors.push(format!("{}: {e}", account.email_address));
                }
            }
        }

        Err(AppError::AllAccountsFailed(errors.join("; ")))
    }
}

/// Render the approval template.
fn render_approval(name: &str, group_link: Option<&str>, event_name: &str) -> String {
    let middle = group_link.map_or_else(
        || {
            "<p>Stay tuned for further updates regarding the event schedule and venue details.</p>"
                .to_string()
        },
        |link| {
            format!(
                "<p>You can now join the official WhatsApp group to stay updated:</p>\
                 <div style=\"margin: 30px 0;\">\
                 <a href=\"{link}\" style=\"background: #25D366; color: white; padding: 12px 24px; border-radius: 6px; text-decoration: none; font-weight: bold;\">\
                 JOIN WHATSAPP GROUP\
                 </a>\
                 </div>"
            )
        },
    );

    format!(
        "<div style=\"font-family: sans-serif; max-width: 600px; margin: auto;\">\
         <p>Hello {name},</p>\
         <p>Your registration for {event_name} has been <strong>approved</strong>.</p>\
         {middle}\
         <p>See you at the event!</p>\
         <hr />\
         <p style=\"font-size: 12px; color: #666;\">This is an automated message. Please do not reply.</p>\
         </div>"
    )
}

/// Render the rejection template.
fn render_rejection(name: &str, event_name: &str) -> String {
    format!(
        "<div style=\"font-family: sans-serif; max-width: 600px; margin: auto;\">\
         <p>Hello {name},</p>\
         <p>Unfortunately, your payment verification for {event_name} was <strong>unsuccessful</strong>.</p>\
         <p>This could be due to an incorrect Transaction ID or Screenshot. Please try registering again with correct details.</p>\
         <p>If you believe this is a mistake, contact the event coordinators.</p>\
         <hr />\
         <p style=\"font-size: 12px; color: #666;\">This is an automated message. Please do not reply.</p>\
         </div>"
    )
}

/// Sender account management (main admin).
#[derive(Clone)]
pub struct EmailAccountService {
    account_repo: EmailAccountRepository,
    id_gen: IdGenerator,
}

/// Input for registering a sender account.
pub struct CreateEmailAccountInput {
    pub email_address: String,
    pub smtp_host: String,
    pub smtp_port: i32,
    pub app_password: String,
}

impl EmailAccountService {
    /// Create a new account management service.
    #[must_use]
    pub const fn new(account_repo: EmailAccountRepository) -> Self {
        Self {
            account_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List all accounts.
    pub async fn list(&self) -> AppResult<Vec<email_account::Model>> {
        self.account_repo.list().await
    }

    /// Register a new account.
    pub async fn create(&self, input: CreateEmailAccountInput) -> AppResult<email_account::Model> {
        if input.email_address.trim().is_empty() || input.smtp_host.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Email address and SMTP host are required".to_string(),
            ));
        }
        if u16::try_from(input.smtp_port).is_err() {
            return Err(AppError::BadRequest("Invalid SMTP port".to_string()));
        }

        let model = email_account::ActiveModel {
            id: Set(self.id_gen.generate()),
            email_address: Set(input.email_address.trim().to_string()),
            smtp_host: Set(input.smtp_host.trim().to_string()),
            smtp_port: Set(input.smtp_port),
            app_password: Set(input.app_password),
            active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.account_repo.create(model).await
    }

    /// Activate or deactivate an account.
    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<email_account::Model> {
        let account = self.account_repo.get_by_id(id).await?;
        let mut model: email_account::ActiveModel = account.into();
        model.active = Set(active);
        self.account_repo.update(model).await
    }

    /// Delete an account.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.account_repo.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("Email account {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn account(id: &str, port: i32) -> email_account::Model {
        email_account::Model {
            id: id.to_string(),
            email_address: format!("{id}@example.com"),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: port,
            app_password: "app-password".to_string(),
            active: true,
            created_at: Utc::now().into(),
        }
    }

    /// Transport that fails for the first `fail_count` attempts.
    struct FlakyTransport {
        attempts: AtomicUsize,
        fail_count: usize,
    }

    impl FlakyTransport {
        fn new(fail_count: usize) -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                fail_count,
            }
        }
    }

    #[async_trait::async_trait]
    impl MailTransport for FlakyTransport {
        async fn send(
            &self,
            account: &email_account::Model,
            _email: &OutgoingEmail,
        ) -> AppResult<()> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.fail_count {
                return Err(AppError::Email(format!(
                    "connection refused for {}",
                    account.email_address
                )));
            }
            Ok(())
        }
    }

    fn dispatcher(
        accounts: Vec<email_account::Model>,
        transport: Arc<FlakyTransport>,
    ) -> EmailService {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([accounts])
                .into_connection(),
        );
        EmailService::new(
            EmailAccountRepository::new(db),
            transport,
            "TechSprint 2K26".to_string(),
        )
    }

    #[tokio::test]
    async fn test_fallback_stops_at_first_success() {
        let transport = Arc::new(FlakyTransport::new(2));
        let svc = dispatcher(
            vec![account("a", 465), account("b", 587), account("c", 587), account("d", 587)],
            Arc::clone(&transport),
        );

        svc.send_approval("asha@example.com", "Asha", Some("https://chat.whatsapp.com/x"))
            .await
            .unwrap();

        // First two accounts fail, third succeeds, fourth is never tried
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_all_accounts_failed_aggregates_errors() {
        let transport = Arc::new(FlakyTransport::new(usize::MAX));
        let svc = dispatcher(
            vec![account("a", 465), account("b", 587), account("c", 587)],
            Arc::clone(&transport),
        );

        match svc.send_rejection("asha@example.com", "Asha").await {
            Err(AppError::AllAccountsFailed(msg)) => {
                assert!(msg.contains("a@example.com"));
                assert!(msg.contains("b@example.com"));
                assert!(msg.contains("c@example.com"));
            }
            other => panic!("Expected AllAccountsFailed, got {other:?}"),
        }
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_pool_is_no_active_accounts() {
        let transport = Arc::new(FlakyTransport::new(0));
        let svc = dispatcher(vec![], Arc::clone(&transport));

        match svc.send_approval("asha@example.com", "Asha", None).await {
            Err(AppError::NoActiveAccounts) => {}
            other => panic!("Expected NoActiveAccounts, got {other:?}"),
        }
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_approval_template_with_link_has_join_button() {
        let html = render_approval("Asha", Some("https://chat.whatsapp.com/x"), "TechSprint 2K26");
        assert!(html.contains("JOIN WHATSAPP GROUP"));
        assert!(html.contains("https://chat.whatsapp.com/x"));
        assert!(html.contains("approved"));
    }

    #[test]
    fn test_approval_template_without_link_degrades() {
        let html = render_approval("Asha", None, "TechSprint 2K26");
        assert!(!html.contains("JOIN WHATSAPP GROUP"));
        assert!(html.contains("Stay tuned"));
    }

    #[test]
    fn test_rejection_template_mentions_re_registration() {
        let html = render_rejection("Asha", "TechSprint 2K26");
        assert!(html.contains("unsuccessful"));
        assert!(html.contains("registering again"));
        assert!(html.contains("coordinators"));
    }
}
