//! Business services.

mod action_log;
mod admin;
mod email;
mod events;
mod group_link;
mod outbox;
mod qr;
mod registration;
mod verification;

pub use action_log::ActionLogService;
pub use admin::{AdminService, CreateAdminInput, LoginResult};
pub use email::{
    CreateEmailAccountInput, EmailAccountService, EmailService, MailTransport, OutgoingEmail,
    SmtpMailer,
};
pub use events::{EventPublisher, RegistrantEvent};
pub use group_link::{classify_college, GroupLinkService};
pub use outbox::OutboxProcessor;
pub use qr::{CreateQrInput, QrService};
pub use registration::{RegistrationInput, RegistrationService, RegistrationStats, ScreenshotUpload};
pub use verification::{TransitionOutcome, VerificationService};
