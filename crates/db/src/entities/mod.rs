//! Database entities.

pub mod action_log;
pub mod admin;
pub mod admin_session;
pub mod email_account;
pub mod group_link;
pub mod notification_outbox;
pub mod qr_code;
pub mod registrant;

pub use action_log::Entity as ActionLog;
pub use admin::Entity as Admin;
pub use admin_session::Entity as AdminSession;
pub use email_account::Entity as EmailAccount;
pub use group_link::Entity as GroupLink;
pub use notification_outbox::Entity as NotificationOutbox;
pub use qr_code::Entity as QrCode;
pub use registrant::Entity as Registrant;
