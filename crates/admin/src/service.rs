//! Admin service wiring.

use std::sync::Arc;

use crm_channels::EmailService;
use crm_core::config::PaginationConfig;
use crm_store::Datastore;

use crate::auth::PasswordHasher;

/// Administrative operations over the portal's stores. All collaborators
/// are constructor-injected; the operation impls live in the sibling
/// modules.
pub struct AdminService<S: Datastore> {
    pub(crate) store: Arc<S>,
    pub(crate) mailer: Arc<EmailService>,
    pub(crate) hasher: Arc<dyn PasswordHasher>,
    pub(crate) pagination: PaginationConfig,
}

impl<S: Datastore> AdminService<S> {
    pub fn new(
        store: Arc<S>,
        mailer: Arc<EmailService>,
        hasher: Arc<dyn PasswordHasher>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            hasher,
            pagination,
        }
    }
}
