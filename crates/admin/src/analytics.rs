//! Headline counts for the admin dashboard.

use crm_core::types::{AccountStatus, AdminAnalytics, Role};
use crm_core::CrmResult;
use crm_store::Datastore;

use crate::service::AdminService;

impl<S: Datastore> AdminService<S> {
    /// Snapshot of customer and interaction volume.
    pub fn analytics(&self) -> CrmResult<AdminAnalytics> {
        Ok(AdminAnalytics {
            total_customers: self.store.count_by_role(Role::Customer)?,
            active_customers: self
                .store
                .count_by_role_and_status(Role::Customer, AccountStatus::Active)?,
            total_interactions: self.store.count_interactions()?,
            // Placeholder until conversion tracking is wired up.
            conversion_rate: 68,
        })
    }
}
