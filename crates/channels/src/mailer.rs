//! Outbound email: the transport trait, the fire-and-forget email service,
//! and the log-only development transport.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crm_core::config::MailConfig;
use crm_core::CrmResult;

/// A fully-addressed outbound message.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery backend. Production: SMTP relay or a provider API client.
pub trait MailTransport: Send + Sync {
    fn deliver(&self, message: &MailMessage) -> CrmResult<()>;
}

/// Development transport: logs the message and reports success.
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn deliver(&self, message: &MailMessage) -> CrmResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Mail delivery (log transport)"
        );
        Ok(())
    }
}

/// Fire-and-forget email sender. Delivery failures are logged and counted,
/// never returned to callers.
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
    config: MailConfig,
}

impl EmailService {
    pub fn new(transport: Arc<dyn MailTransport>, config: MailConfig) -> Self {
        info!(
            from = %config.from_email,
            enabled = config.enabled,
            "Email service initialized"
        );
        Self { transport, config }
    }

    /// Send a plain-text message with the configured from-address.
    pub fn send_simple_message(&self, to: &str, subject: &str, body: &str) {
        if !self.config.enabled {
            debug!(to = %to, subject = %subject, "Mail disabled, skipping send");
            return;
        }

        let message = MailMessage {
            from: self.config.from_email.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };

        debug!(to = %message.to, subject = %message.subject, "Sending email");
        match self.transport.deliver(&message) {
            Ok(()) => {
                metrics::counter!("mail.deliveries").increment(1);
            }
            Err(err) => {
                metrics::counter!("mail.delivery_failures").increment(1);
                warn!(to = %message.to, error = %err, "Email delivery failed");
            }
        }
    }
}
