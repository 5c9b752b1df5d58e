//! In-memory datastore backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same API surface for development and testing,
//! including unit-of-work rollback via an undo journal.

use std::thread::{self, ThreadId};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crm_core::types::{
    Account, AccountStatus, CampaignProposal, EmailCampaign, InteractionRecord, Notification,
    Page, PageRequest, ReviewStatus, Role, SystemSettings,
};
use crm_core::CrmResult;

use crate::stores::{
    AccountStore, CampaignProposalStore, Datastore, EmailCampaignStore, InteractionStore,
    NotificationStore, SettingsStore,
};

/// Prior value of one row, captured before a write inside a unit of work.
enum Undo {
    Account { id: Uuid, prior: Option<Account> },
    Proposal { id: Uuid, prior: Option<CampaignProposal> },
    Interaction { id: Uuid, prior: Option<InteractionRecord> },
    Notification { id: Uuid, prior: Option<Notification> },
    Settings { id: Uuid, prior: Option<SystemSettings> },
    EmailCampaign { id: Uuid, prior: Option<EmailCampaign> },
}

/// Undo log for one open unit of work. Owned by the thread that opened the
/// scope; writes from any other thread bypass it entirely.
struct Journal {
    owner: ThreadId,
    entries: Vec<Undo>,
}

/// Thread-safe in-memory store for accounts, proposals, interactions,
/// notifications, settings, and email campaigns.
///
/// Units of work are serialized behind `tx_gate`. The journal is armed only
/// while a scope is open and only records writes made by the thread that
/// opened it, so direct writes from other threads commit untouched.
pub struct MemoryDatastore {
    accounts: DashMap<Uuid, Account>,
    proposals: DashMap<Uuid, CampaignProposal>,
    interactions: DashMap<Uuid, InteractionRecord>,
    notifications: DashMap<Uuid, Notification>,
    settings: DashMap<Uuid, SystemSettings>,
    email_campaigns: DashMap<Uuid, EmailCampaign>,
    tx_gate: Mutex<()>,
    journal: Mutex<Option<Journal>>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        info!("In-memory datastore initialized (development mode)");
        Self {
            accounts: DashMap::new(),
            proposals: DashMap::new(),
            interactions: DashMap::new(),
            notifications: DashMap::new(),
            settings: DashMap::new(),
            email_campaigns: DashMap::new(),
            tx_gate: Mutex::new(()),
            journal: Mutex::new(None),
        }
    }

    /// Run `op` with rollback-on-error. Exposed separately from
    /// [`Datastore::with_transaction`] so delegating wrappers can reuse the
    /// scope while routing store calls through themselves.
    pub fn transaction_scope<T>(&self, op: impl FnOnce() -> CrmResult<T>) -> CrmResult<T> {
        let _gate = self.tx_gate.lock();
        *self.journal.lock() = Some(Journal {
            owner: thread::current().id(),
            entries: Vec::new(),
        });
        let outcome = op();
        let journal = self.journal.lock().take();
        if outcome.is_err() {
            if let Some(journal) = journal {
                debug!(entries = journal.entries.len(), "Rolling back unit of work");
                self.roll_back(journal.entries);
            }
        }
        outcome
    }

    fn record(&self, entry: Undo) {
        if let Some(journal) = self.journal.lock().as_mut() {
            if journal.owner == thread::current().id() {
                journal.entries.push(entry);
            }
        }
    }

    fn roll_back(&self, journal: Vec<Undo>) {
        for entry in journal.into_iter().rev() {
            match entry {
                Undo::Account { id, prior } => restore(&self.accounts, id, prior),
                Undo::Proposal { id, prior } => restore(&self.proposals, id, prior),
                Undo::Interaction { id, prior } => restore(&self.interactions, id, prior),
                Undo::Notification { id, prior } => restore(&self.notifications, id, prior),
                Undo::Settings { id, prior } => restore(&self.settings, id, prior),
                Undo::EmailCampaign { id, prior } => restore(&self.email_campaigns, id, prior),
            }
        }
    }
}

fn restore<V>(map: &DashMap<Uuid, V>, id: Uuid, prior: Option<V>) {
    match prior {
        Some(value) => {
            map.insert(id, value);
        }
        None => {
            map.remove(&id);
        }
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset())
        .take(page.size as usize)
        .collect();
    Page {
        items,
        page: page.page,
        size: page.size,
        total,
    }
}

// ─── Accounts ───────────────────────────────────────────────────────────────

impl AccountStore for MemoryDatastore {
    fn find_account(&self, id: Uuid) -> CrmResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|r| r.value().clone()))
    }

    fn find_account_by_username(&self, username: &str) -> CrmResult<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .find(|r| r.value().username == username)
            .map(|r| r.value().clone()))
    }

    fn accounts_by_role(&self, role: Role, page: PageRequest) -> CrmResult<Page<Account>> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|r| r.value().role == role)
            .map(|r| r.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(paginate(accounts, page))
    }

    fn accounts_by_role_and_status(
        &self,
        role: Role,
        status: AccountStatus,
        page: PageRequest,
    ) -> CrmResult<Page<Account>> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|r| r.value().role == role && r.value().status == status)
            .map(|r| r.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(paginate(accounts, page))
    }

    fn count_by_role(&self, role: Role) -> CrmResult<u64> {
        Ok(self
            .accounts
            .iter()
            .filter(|r| r.value().role == role)
            .count() as u64)
    }

    fn count_by_role_and_status(&self, role: Role, status: AccountStatus) -> CrmResult<u64> {
        Ok(self
            .accounts
            .iter()
            .filter(|r| r.value().role == role && r.value().status == status)
            .count() as u64)
    }

    fn save_account(&self, account: &Account) -> CrmResult<Account> {
        self.record(Undo::Account {
            id: account.id,
            prior: self.accounts.get(&account.id).map(|r| r.value().clone()),
        });
        self.accounts.insert(account.id, account.clone());
        Ok(account.clone())
    }

    fn delete_account(&self, id: Uuid) -> CrmResult<()> {
        if let Some((_, prior)) = self.accounts.remove(&id) {
            self.record(Undo::Account {
                id,
                prior: Some(prior),
            });
        }
        Ok(())
    }
}

// ─── Campaign proposals ─────────────────────────────────────────────────────

impl CampaignProposalStore for MemoryDatastore {
    fn find_proposal(&self, id: Uuid) -> CrmResult<Option<CampaignProposal>> {
        Ok(self.proposals.get(&id).map(|r| r.value().clone()))
    }

    fn proposals_by_status(&self, status: ReviewStatus) -> CrmResult<Vec<CampaignProposal>> {
        let mut proposals: Vec<CampaignProposal> = self
            .proposals
            .iter()
            .filter(|r| r.value().status == status)
            .map(|r| r.value().clone())
            .collect();
        proposals.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(proposals)
    }

    fn save_proposal(&self, proposal: &CampaignProposal) -> CrmResult<CampaignProposal> {
        self.record(Undo::Proposal {
            id: proposal.id,
            prior: self.proposals.get(&proposal.id).map(|r| r.value().clone()),
        });
        self.proposals.insert(proposal.id, proposal.clone());
        Ok(proposal.clone())
    }

    fn delete_proposals_by_customer(&self, customer_id: Uuid) -> CrmResult<u64> {
        let ids: Vec<Uuid> = self
            .proposals
            .iter()
            .filter(|r| r.value().customer_id == customer_id)
            .map(|r| *r.key())
            .collect();
        let mut removed = 0;
        for id in ids {
            if let Some((_, prior)) = self.proposals.remove(&id) {
                self.record(Undo::Proposal {
                    id,
                    prior: Some(prior),
                });
                removed += 1;
            }
        }
        Ok(removed)
    }
}

// ─── Interactions ───────────────────────────────────────────────────────────

impl InteractionStore for MemoryDatastore {
    fn find_interaction(&self, id: Uuid) -> CrmResult<Option<InteractionRecord>> {
        Ok(self.interactions.get(&id).map(|r| r.value().clone()))
    }

    fn interactions_by_status(
        &self,
        status: ReviewStatus,
        page: PageRequest,
    ) -> CrmResult<Page<InteractionRecord>> {
        let mut interactions: Vec<InteractionRecord> = self
            .interactions
            .iter()
            .filter(|r| r.value().status == status)
            .map(|r| r.value().clone())
            .collect();
        interactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(interactions, page))
    }

    fn count_interactions(&self) -> CrmResult<u64> {
        Ok(self.interactions.len() as u64)
    }

    fn save_interaction(&self, interaction: &InteractionRecord) -> CrmResult<InteractionRecord> {
        self.record(Undo::Interaction {
            id: interaction.id,
            prior: self
                .interactions
                .get(&interaction.id)
                .map(|r| r.value().clone()),
        });
        self.interactions.insert(interaction.id, interaction.clone());
        Ok(interaction.clone())
    }

    fn delete_interactions_by_customer(&self, customer_id: Uuid) -> CrmResult<u64> {
        let ids: Vec<Uuid> = self
            .interactions
            .iter()
            .filter(|r| r.value().customer_id == customer_id)
            .map(|r| *r.key())
            .collect();
        let mut removed = 0;
        for id in ids {
            if let Some((_, prior)) = self.interactions.remove(&id) {
                self.record(Undo::Interaction {
                    id,
                    prior: Some(prior),
                });
                removed += 1;
            }
        }
        Ok(removed)
    }
}

// ─── Notifications ──────────────────────────────────────────────────────────

impl NotificationStore for MemoryDatastore {
    fn save_notification(&self, notification: &Notification) -> CrmResult<Notification> {
        self.record(Undo::Notification {
            id: notification.id,
            prior: self
                .notifications
                .get(&notification.id)
                .map(|r| r.value().clone()),
        });
        self.notifications
            .insert(notification.id, notification.clone());
        Ok(notification.clone())
    }

    fn notifications_for_account(&self, account_id: Uuid) -> CrmResult<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|r| r.value().account_id == account_id)
            .map(|r| r.value().clone())
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    fn delete_notifications_for_account(&self, account_id: Uuid) -> CrmResult<u64> {
        let ids: Vec<Uuid> = self
            .notifications
            .iter()
            .filter(|r| r.value().account_id == account_id)
            .map(|r| *r.key())
            .collect();
        let mut removed = 0;
        for id in ids {
            if let Some((_, prior)) = self.notifications.remove(&id) {
                self.record(Undo::Notification {
                    id,
                    prior: Some(prior),
                });
                removed += 1;
            }
        }
        Ok(removed)
    }
}

// ─── Settings ───────────────────────────────────────────────────────────────

impl SettingsStore for MemoryDatastore {
    fn find_settings(&self, id: Uuid) -> CrmResult<Option<SystemSettings>> {
        Ok(self.settings.get(&id).map(|r| r.value().clone()))
    }

    fn save_settings(&self, settings: &SystemSettings) -> CrmResult<SystemSettings> {
        self.record(Undo::Settings {
            id: settings.id,
            prior: self.settings.get(&settings.id).map(|r| r.value().clone()),
        });
        self.settings.insert(settings.id, settings.clone());
        Ok(settings.clone())
    }
}

// ─── Email campaigns ────────────────────────────────────────────────────────

impl EmailCampaignStore for MemoryDatastore {
    fn find_email_campaign(&self, id: Uuid) -> CrmResult<Option<EmailCampaign>> {
        Ok(self.email_campaigns.get(&id).map(|r| r.value().clone()))
    }

    fn list_email_campaigns(&self, page: PageRequest) -> CrmResult<Page<EmailCampaign>> {
        let mut campaigns: Vec<EmailCampaign> = self
            .email_campaigns
            .iter()
            .map(|r| r.value().clone())
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(campaigns, page))
    }

    fn save_email_campaign(&self, campaign: &EmailCampaign) -> CrmResult<EmailCampaign> {
        self.record(Undo::EmailCampaign {
            id: campaign.id,
            prior: self
                .email_campaigns
                .get(&campaign.id)
                .map(|r| r.value().clone()),
        });
        self.email_campaigns.insert(campaign.id, campaign.clone());
        Ok(campaign.clone())
    }

    fn delete_email_campaign(&self, id: Uuid) -> CrmResult<()> {
        if let Some((_, prior)) = self.email_campaigns.remove(&id) {
            self.record(Undo::EmailCampaign {
                id,
                prior: Some(prior),
            });
        }
        Ok(())
    }
}

impl Datastore for MemoryDatastore {
    fn with_transaction<T, F>(&self, op: F) -> CrmResult<T>
    where
        F: FnOnce(&Self) -> CrmResult<T>,
    {
        self.transaction_scope(|| op(self))
    }
}

impl Default for MemoryDatastore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};

    use crm_core::CrmError;

    fn pending_customer(username: &str) -> Account {
        let mut account = Account::new_customer(username, format!("{username}@test.com"), "hash");
        account.status = AccountStatus::Pending;
        account
    }

    #[test]
    fn test_save_and_find_account() {
        let store = MemoryDatastore::new();
        let account = Account::new_customer("alice", "alice@test.com", "hash");
        store.save_account(&account).unwrap();

        let found = store.find_account(account.id).unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(store.find_account(Uuid::new_v4()).unwrap().is_none());

        let by_name = store.find_account_by_username("alice").unwrap().unwrap();
        assert_eq!(by_name.id, account.id);
    }

    #[test]
    fn test_accounts_by_role_and_status_filters_and_pages() {
        let store = MemoryDatastore::new();
        for i in 0..5 {
            store
                .save_account(&pending_customer(&format!("user{i}")))
                .unwrap();
        }
        store
            .save_account(&Account::new_customer("active", "active@test.com", "hash"))
            .unwrap();

        let pending = store
            .accounts_by_role_and_status(
                Role::Customer,
                AccountStatus::Pending,
                PageRequest::new(0, 3),
            )
            .unwrap();
        assert_eq!(pending.items.len(), 3);
        assert_eq!(pending.total, 5);
        assert_eq!(pending.total_pages(), 2);

        let second = store
            .accounts_by_role_and_status(
                Role::Customer,
                AccountStatus::Pending,
                PageRequest::new(1, 3),
            )
            .unwrap();
        assert_eq!(second.items.len(), 2);
    }

    #[test]
    fn test_transaction_commit_keeps_writes() {
        let store = MemoryDatastore::new();
        let account = Account::new_customer("bob", "bob@test.com", "hash");

        store
            .with_transaction(|s| {
                s.save_account(&account)?;
                s.save_proposal(&CampaignProposal::new(account.id, "Spring launch"))?;
                Ok(())
            })
            .unwrap();

        assert!(store.find_account(account.id).unwrap().is_some());
        assert_eq!(
            store
                .proposals_by_status(ReviewStatus::Pending)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_transaction_rollback_restores_prior_state() {
        let store = MemoryDatastore::new();
        let mut account = Account::new_customer("carol", "carol@test.com", "hash");
        store.save_account(&account).unwrap();

        let result: CrmResult<()> = store.with_transaction(|s| {
            account.status = AccountStatus::Suspended;
            s.save_account(&account)?;
            s.save_notification(&Notification::new(account.id, "suspended"))?;
            Err(CrmError::Storage("boom".into()))
        });
        assert!(result.is_err());

        let found = store.find_account(account.id).unwrap().unwrap();
        assert_eq!(found.status, AccountStatus::Active);
        assert!(store
            .notifications_for_account(account.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_transaction_rollback_restores_bulk_deletes() {
        let store = MemoryDatastore::new();
        let customer_id = Uuid::new_v4();
        for i in 0..3 {
            store
                .save_interaction(&InteractionRecord::new(customer_id, format!("call {i}")))
                .unwrap();
        }

        let result: CrmResult<()> = store.with_transaction(|s| {
            let removed = s.delete_interactions_by_customer(customer_id)?;
            assert_eq!(removed, 3);
            Err(CrmError::Storage("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.count_interactions().unwrap(), 3);
    }

    #[test]
    fn test_rollback_skips_writes_from_other_threads() {
        let store = Arc::new(MemoryDatastore::new());
        let account = Account::new_customer("dana", "dana@test.com", "hash");
        let barrier = Arc::new(Barrier::new(2));

        let worker = {
            let store = store.clone();
            let barrier = barrier.clone();
            let account_id = account.id;
            thread::spawn(move || {
                let result: CrmResult<()> = store.with_transaction(|s| {
                    s.save_notification(&Notification::new(account_id, "scoped"))?;
                    barrier.wait();
                    barrier.wait();
                    Err(CrmError::Storage("boom".into()))
                });
                assert!(result.is_err());
            })
        };

        // Commit a plain write while the worker's unit of work is open.
        barrier.wait();
        store.save_account(&account).unwrap();
        barrier.wait();
        worker.join().unwrap();

        // The worker's rollback undoes its own write and nothing else.
        assert!(store.find_account(account.id).unwrap().is_some());
        assert!(store
            .notifications_for_account(account.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete_by_customer_leaves_other_rows() {
        let store = MemoryDatastore::new();
        let victim = Uuid::new_v4();
        let bystander = Uuid::new_v4();
        store
            .save_interaction(&InteractionRecord::new(victim, "victim call"))
            .unwrap();
        store
            .save_interaction(&InteractionRecord::new(bystander, "bystander call"))
            .unwrap();

        assert_eq!(store.delete_interactions_by_customer(victim).unwrap(), 1);
        assert_eq!(store.count_interactions().unwrap(), 1);
    }

    #[test]
    fn test_settings_upsert() {
        let store = MemoryDatastore::new();
        let settings = SystemSettings::default();
        assert!(store.find_settings(settings.id).unwrap().is_none());

        store.save_settings(&settings).unwrap();
        let mut updated = store.find_settings(settings.id).unwrap().unwrap();
        updated.general_settings = r#"{"theme":"dark"}"#.to_string();
        store.save_settings(&updated).unwrap();

        let found = store.find_settings(settings.id).unwrap().unwrap();
        assert_eq!(found.general_settings, r#"{"theme":"dark"}"#);
    }
}
