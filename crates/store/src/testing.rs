//! Test doubles for the persistence layer, shared across crates.

use parking_lot::Mutex;
use uuid::Uuid;

use crm_core::types::{
    Account, AccountStatus, CampaignProposal, EmailCampaign, InteractionRecord, Notification,
    Page, PageRequest, ReviewStatus, Role, SystemSettings,
};
use crm_core::{CrmError, CrmResult};

use crate::memory::MemoryDatastore;
use crate::stores::{
    AccountStore, CampaignProposalStore, Datastore, EmailCampaignStore, InteractionStore,
    NotificationStore, SettingsStore,
};

/// Delegating wrapper around [`MemoryDatastore`] that fails a named store
/// method on demand. Lets tests abort a unit of work at an exact step.
pub struct FaultyDatastore {
    inner: MemoryDatastore,
    fail_method: Mutex<Option<String>>,
}

impl FaultyDatastore {
    pub fn new() -> Self {
        Self {
            inner: MemoryDatastore::new(),
            fail_method: Mutex::new(None),
        }
    }

    /// Make every call to `method` fail until [`Self::clear_fault`].
    pub fn fail_on(&self, method: &str) {
        *self.fail_method.lock() = Some(method.to_string());
    }

    pub fn clear_fault(&self) {
        *self.fail_method.lock() = None;
    }

    fn check(&self, method: &str) -> CrmResult<()> {
        if self.fail_method.lock().as_deref() == Some(method) {
            return Err(CrmError::Storage(format!("injected failure in {method}")));
        }
        Ok(())
    }
}

impl Default for FaultyDatastore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for FaultyDatastore {
    fn find_account(&self, id: Uuid) -> CrmResult<Option<Account>> {
        self.check("find_account")?;
        self.inner.find_account(id)
    }

    fn find_account_by_username(&self, username: &str) -> CrmResult<Option<Account>> {
        self.check("find_account_by_username")?;
        self.inner.find_account_by_username(username)
    }

    fn accounts_by_role(&self, role: Role, page: PageRequest) -> CrmResult<Page<Account>> {
        self.check("accounts_by_role")?;
        self.inner.accounts_by_role(role, page)
    }

    fn accounts_by_role_and_status(
        &self,
        role: Role,
        status: AccountStatus,
        page: PageRequest,
    ) -> CrmResult<Page<Account>> {
        self.check("accounts_by_role_and_status")?;
        self.inner.accounts_by_role_and_status(role, status, page)
    }

    fn count_by_role(&self, role: Role) -> CrmResult<u64> {
        self.check("count_by_role")?;
        self.inner.count_by_role(role)
    }

    fn count_by_role_and_status(&self, role: Role, status: AccountStatus) -> CrmResult<u64> {
        self.check("count_by_role_and_status")?;
        self.inner.count_by_role_and_status(role, status)
    }

    fn save_account(&self, account: &Account) -> CrmResult<Account> {
        self.check("save_account")?;
        self.inner.save_account(account)
    }

    fn delete_account(&self, id: Uuid) -> CrmResult<()> {
        self.check("delete_account")?;
        self.inner.delete_account(id)
    }
}

impl CampaignProposalStore for FaultyDatastore {
    fn find_proposal(&self, id: Uuid) -> CrmResult<Option<CampaignProposal>> {
        self.check("find_proposal")?;
        self.inner.find_proposal(id)
    }

    fn proposals_by_status(&self, status: ReviewStatus) -> CrmResult<Vec<CampaignProposal>> {
        self.check("proposals_by_status")?;
        self.inner.proposals_by_status(status)
    }

    fn save_proposal(&self, proposal: &CampaignProposal) -> CrmResult<CampaignProposal> {
        self.check("save_proposal")?;
        self.inner.save_proposal(proposal)
    }

    fn delete_proposals_by_customer(&self, customer_id: Uuid) -> CrmResult<u64> {
        self.check("delete_proposals_by_customer")?;
        self.inner.delete_proposals_by_customer(customer_id)
    }
}

impl InteractionStore for FaultyDatastore {
    fn find_interaction(&self, id: Uuid) -> CrmResult<Option<InteractionRecord>> {
        self.check("find_interaction")?;
        self.inner.find_interaction(id)
    }

    fn interactions_by_status(
        &self,
        status: ReviewStatus,
        page: PageRequest,
    ) -> CrmResult<Page<InteractionRecord>> {
        self.check("interactions_by_status")?;
        self.inner.interactions_by_status(status, page)
    }

    fn count_interactions(&self) -> CrmResult<u64> {
        self.check("count_interactions")?;
        self.inner.count_interactions()
    }

    fn save_interaction(&self, interaction: &InteractionRecord) -> CrmResult<InteractionRecord> {
        self.check("save_interaction")?;
        self.inner.save_interaction(interaction)
    }

    fn delete_interactions_by_customer(&self, customer_id: Uuid) -> CrmResult<u64> {
        self.check("delete_interactions_by_customer")?;
        self.inner.delete_interactions_by_customer(customer_id)
    }
}

impl NotificationStore for FaultyDatastore {
    fn save_notification(&self, notification: &Notification) -> CrmResult<Notification> {
        self.check("save_notification")?;
        self.inner.save_notification(notification)
    }

    fn notifications_for_account(&self, account_id: Uuid) -> CrmResult<Vec<Notification>> {
        self.check("notifications_for_account")?;
        self.inner.notifications_for_account(account_id)
    }

    fn delete_notifications_for_account(&self, account_id: Uuid) -> CrmResult<u64> {
        self.check("delete_notifications_for_account")?;
        self.inner.delete_notifications_for_account(account_id)
    }
}

impl SettingsStore for FaultyDatastore {
    fn find_settings(&self, id: Uuid) -> CrmResult<Option<SystemSettings>> {
        self.check("find_settings")?;
        self.inner.find_settings(id)
    }

    fn save_settings(&self, settings: &SystemSettings) -> CrmResult<SystemSettings> {
        self.check("save_settings")?;
        self.inner.save_settings(settings)
    }
}

impl EmailCampaignStore for FaultyDatastore {
    fn find_email_campaign(&self, id: Uuid) -> CrmResult<Option<EmailCampaign>> {
        self.check("find_email_campaign")?;
        self.inner.find_email_campaign(id)
    }

    fn list_email_campaigns(&self, page: PageRequest) -> CrmResult<Page<EmailCampaign>> {
        self.check("list_email_campaigns")?;
        self.inner.list_email_campaigns(page)
    }

    fn save_email_campaign(&self, campaign: &EmailCampaign) -> CrmResult<EmailCampaign> {
        self.check("save_email_campaign")?;
        self.inner.save_email_campaign(campaign)
    }

    fn delete_email_campaign(&self, id: Uuid) -> CrmResult<()> {
        self.check("delete_email_campaign")?;
        self.inner.delete_email_campaign(id)
    }
}

impl Datastore for FaultyDatastore {
    // Routes store calls back through the wrapper so injected faults fire
    // inside the scope, while the inner journal handles rollback. The scope
    // itself is a fault point too, so tests can check an operation opens one.
    fn with_transaction<T, F>(&self, op: F) -> CrmResult<T>
    where
        F: FnOnce(&Self) -> CrmResult<T>,
    {
        self.check("with_transaction")?;
        self.inner.transaction_scope(|| op(self))
    }
}
