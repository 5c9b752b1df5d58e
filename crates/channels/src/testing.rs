//! Test doubles for mail delivery, shared across crates.

use parking_lot::Mutex;

use crm_core::{CrmError, CrmResult};

use crate::mailer::{MailMessage, MailTransport};

/// Captures every message instead of delivering it.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn deliver(&self, message: &MailMessage) -> CrmResult<()> {
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

/// Refuses every message, counting the attempts; exercises the
/// swallow-and-log path.
#[derive(Default)]
pub struct FailingTransport {
    attempts: Mutex<u32>,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock()
    }
}

impl MailTransport for FailingTransport {
    fn deliver(&self, message: &MailMessage) -> CrmResult<()> {
        *self.attempts.lock() += 1;
        Err(CrmError::Delivery(format!("refused mail to {}", message.to)))
    }
}
