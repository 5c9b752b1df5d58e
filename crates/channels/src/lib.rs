//! Outbound delivery channels for the CRM Portal backend (email only).

pub mod mailer;
pub mod testing;

pub use mailer::{EmailService, LogTransport, MailMessage, MailTransport};
