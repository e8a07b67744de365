//! Repository layer wrapping database access.

mod action_log;
mod admin;
mod admin_session;
mod email_account;
mod group_link;
mod notification_outbox;
mod qr_code;
mod registrant;

pub use action_log::ActionLogRepository;
pub use admin::AdminRepository;
pub use admin_session::AdminSessionRepository;
pub use email_account::EmailAccountRepository;
pub use group_link::GroupLinkRepository;
pub use notification_outbox::NotificationOutboxRepository;
pub use qr_code::QrCodeRepository;
pub use registrant::RegistrantRepository;
