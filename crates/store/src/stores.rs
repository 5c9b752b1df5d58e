//! Store traits consumed by the admin service.
//!
//! One trait per aggregate, bundled by [`Datastore`], which also hands out
//! the unit-of-work scope every mutating admin operation runs in.

use crm_core::types::{
    Account, AccountStatus, CampaignProposal, EmailCampaign, InteractionRecord, Notification,
    Page, PageRequest, ReviewStatus, Role, SystemSettings,
};
use crm_core::CrmResult;
use uuid::Uuid;

pub trait AccountStore: Send + Sync {
    fn find_account(&self, id: Uuid) -> CrmResult<Option<Account>>;
    fn find_account_by_username(&self, username: &str) -> CrmResult<Option<Account>>;
    fn accounts_by_role(&self, role: Role, page: PageRequest) -> CrmResult<Page<Account>>;
    fn accounts_by_role_and_status(
        &self,
        role: Role,
        status: AccountStatus,
        page: PageRequest,
    ) -> CrmResult<Page<Account>>;
    fn count_by_role(&self, role: Role) -> CrmResult<u64>;
    fn count_by_role_and_status(&self, role: Role, status: AccountStatus) -> CrmResult<u64>;
    fn save_account(&self, account: &Account) -> CrmResult<Account>;
    fn delete_account(&self, id: Uuid) -> CrmResult<()>;
}

pub trait CampaignProposalStore: Send + Sync {
    fn find_proposal(&self, id: Uuid) -> CrmResult<Option<CampaignProposal>>;
    fn proposals_by_status(&self, status: ReviewStatus) -> CrmResult<Vec<CampaignProposal>>;
    fn save_proposal(&self, proposal: &CampaignProposal) -> CrmResult<CampaignProposal>;
    fn delete_proposals_by_customer(&self, customer_id: Uuid) -> CrmResult<u64>;
}

pub trait InteractionStore: Send + Sync {
    fn find_interaction(&self, id: Uuid) -> CrmResult<Option<InteractionRecord>>;
    fn interactions_by_status(
        &self,
        status: ReviewStatus,
        page: PageRequest,
    ) -> CrmResult<Page<InteractionRecord>>;
    fn count_interactions(&self) -> CrmResult<u64>;
    fn save_interaction(&self, interaction: &InteractionRecord) -> CrmResult<InteractionRecord>;
    fn delete_interactions_by_customer(&self, customer_id: Uuid) -> CrmResult<u64>;
}

pub trait NotificationStore: Send + Sync {
    fn save_notification(&self, notification: &Notification) -> CrmResult<Notification>;
    fn notifications_for_account(&self, account_id: Uuid) -> CrmResult<Vec<Notification>>;
    fn delete_notifications_for_account(&self, account_id: Uuid) -> CrmResult<u64>;
}

pub trait SettingsStore: Send + Sync {
    fn find_settings(&self, id: Uuid) -> CrmResult<Option<SystemSettings>>;
    fn save_settings(&self, settings: &SystemSettings) -> CrmResult<SystemSettings>;
}

pub trait EmailCampaignStore: Send + Sync {
    fn find_email_campaign(&self, id: Uuid) -> CrmResult<Option<EmailCampaign>>;
    fn list_email_campaigns(&self, page: PageRequest) -> CrmResult<Page<EmailCampaign>>;
    fn save_email_campaign(&self, campaign: &EmailCampaign) -> CrmResult<EmailCampaign>;
    fn delete_email_campaign(&self, id: Uuid) -> CrmResult<()>;
}

/// Everything the admin service needs from persistence.
pub trait Datastore:
    AccountStore
    + CampaignProposalStore
    + InteractionStore
    + NotificationStore
    + SettingsStore
    + EmailCampaignStore
{
    /// Run `op` as one unit of work: when it returns `Err`, every write
    /// made inside the scope is rolled back before the error surfaces.
    fn with_transaction<T, F>(&self, op: F) -> CrmResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> CrmResult<T>;
}
