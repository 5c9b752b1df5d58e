//! Customer directory management: listing, creation, profile updates, and
//! cascading deletion.

use tracing::info;
use uuid::Uuid;

use crm_core::types::{Account, Page, PageRequest, Role};
use crm_core::{CrmError, CrmResult};
use crm_store::Datastore;

use crate::requests::{NewCustomer, UpdateCustomer};
use crate::service::AdminService;

impl<S: Datastore> AdminService<S> {
    /// Customer accounts, paged and ordered by username.
    pub fn list_customers(&self, page: PageRequest) -> CrmResult<Page<Account>> {
        self.store
            .accounts_by_role(Role::Customer, self.pagination.clamp(page))
    }

    /// Create a customer account directly. Admin-created accounts skip the
    /// approval queue and are born ACTIVE.
    pub fn add_customer(&self, new: NewCustomer) -> CrmResult<Account> {
        if new.password.trim().is_empty() {
            return Err(CrmError::InvalidArgument(
                "password is required for a new customer".into(),
            ));
        }

        let mut account =
            Account::new_customer(new.username, new.email, self.hasher.hash(&new.password));
        account.phone = new.phone;
        account.age = new.age;
        account.address = new.address;

        let saved = self.store.with_transaction(|s| s.save_account(&account))?;
        info!(customer_id = %saved.id, username = %saved.username, "Customer created");
        Ok(saved)
    }

    /// Apply the populated fields of `changes` to an existing customer.
    pub fn update_customer(&self, customer_id: Uuid, changes: UpdateCustomer) -> CrmResult<Account> {
        let updated = self.store.with_transaction(|s| {
            let mut account = s
                .find_account(customer_id)?
                .filter(|a| a.role == Role::Customer)
                .ok_or_else(|| CrmError::NotFound(format!("customer {customer_id}")))?;

            if let Some(username) = changes.username {
                account.username = username;
            }
            if let Some(email) = changes.email {
                account.email = email;
            }
            if let Some(phone) = changes.phone {
                account.phone = Some(phone);
            }
            if let Some(age) = changes.age {
                account.age = Some(age);
            }
            if let Some(address) = changes.address {
                account.address = Some(address);
            }
            if let Some(status) = changes.status {
                account.status = status;
            }
            s.save_account(&account)
        })?;

        info!(customer_id = %updated.id, "Customer updated");
        Ok(updated)
    }

    /// Delete a customer together with every dependent row. The cascade is
    /// all or nothing: a failure part-way leaves the customer intact.
    pub fn delete_customer(&self, customer_id: Uuid) -> CrmResult<()> {
        let (interactions, notifications, proposals) = self.store.with_transaction(|s| {
            let account = s
                .find_account(customer_id)?
                .filter(|a| a.role == Role::Customer)
                .ok_or_else(|| CrmError::NotFound(format!("customer {customer_id}")))?;

            let interactions = s.delete_interactions_by_customer(account.id)?;
            let notifications = s.delete_notifications_for_account(account.id)?;
            let proposals = s.delete_proposals_by_customer(account.id)?;
            s.delete_account(account.id)?;
            Ok((interactions, notifications, proposals))
        })?;

        info!(
            customer_id = %customer_id,
            interactions,
            notifications,
            proposals,
            "Customer deleted with dependents"
        );
        metrics::counter!("admin.customers_deleted").increment(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crm_channels::testing::RecordingTransport;
    use crm_channels::EmailService;
    use crm_core::config::{MailConfig, PaginationConfig};
    use crm_core::types::{
        AccountStatus, CampaignProposal, InteractionRecord, Notification, ReviewStatus,
    };
    use crm_store::testing::FaultyDatastore;
    use crm_store::{
        AccountStore, CampaignProposalStore, InteractionStore, MemoryDatastore, NotificationStore,
    };

    use crate::auth::{PasswordHasher, Sha256PasswordHasher};

    fn setup() -> (Arc<MemoryDatastore>, AdminService<MemoryDatastore>) {
        let store = Arc::new(MemoryDatastore::new());
        let mailer = Arc::new(EmailService::new(
            Arc::new(RecordingTransport::new()),
            MailConfig::default(),
        ));
        let service = AdminService::new(
            store.clone(),
            mailer,
            Arc::new(Sha256PasswordHasher::new()),
            PaginationConfig::default(),
        );
        (store, service)
    }

    fn new_customer(username: &str) -> NewCustomer {
        NewCustomer {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password: "hunter2".to_string(),
            phone: None,
            age: None,
            address: None,
        }
    }

    fn admin(username: &str) -> Account {
        let mut account = Account::new_customer(username, format!("{username}@test.com"), "hash");
        account.role = Role::Admin;
        account
    }

    #[test]
    fn test_add_customer_requires_password() {
        let (_store, service) = setup();

        let mut request = new_customer("alice");
        request.password = String::new();
        assert!(matches!(
            service.add_customer(request),
            Err(CrmError::InvalidArgument(_))
        ));

        let mut request = new_customer("alice");
        request.password = "   ".to_string();
        assert!(matches!(
            service.add_customer(request),
            Err(CrmError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_add_customer_hashes_password_and_activates() {
        let (store, service) = setup();
        let mut request = new_customer("bob");
        request.phone = Some("555-0101".to_string());

        let saved = service.add_customer(request).unwrap();
        assert_eq!(saved.role, Role::Customer);
        assert_eq!(saved.status, AccountStatus::Active);
        assert_eq!(saved.phone.as_deref(), Some("555-0101"));
        assert_ne!(saved.password_hash, "hunter2");
        assert!(Sha256PasswordHasher::new().verify("hunter2", &saved.password_hash));
        assert!(store.find_account(saved.id).unwrap().is_some());
    }

    #[test]
    fn test_add_customer_writes_in_a_unit_of_work() {
        let store = Arc::new(FaultyDatastore::new());
        let mailer = Arc::new(EmailService::new(
            Arc::new(RecordingTransport::new()),
            MailConfig::default(),
        ));
        let service = AdminService::new(
            store.clone(),
            mailer,
            Arc::new(Sha256PasswordHasher::new()),
            PaginationConfig::default(),
        );

        store.fail_on("with_transaction");
        assert!(matches!(
            service.add_customer(new_customer("ivan")),
            Err(CrmError::Storage(_))
        ));

        store.clear_fault();
        assert!(store.find_account_by_username("ivan").unwrap().is_none());
    }

    #[test]
    fn test_update_customer_merges_populated_fields() {
        let (store, service) = setup();
        let account = Account::new_customer("carol", "carol@test.com", "hash");
        store.save_account(&account).unwrap();

        let updated = service
            .update_customer(
                account.id,
                UpdateCustomer {
                    email: Some("carol@corp.com".to_string()),
                    age: Some(34),
                    status: Some(AccountStatus::Suspended),
                    ..UpdateCustomer::default()
                },
            )
            .unwrap();

        assert_eq!(updated.username, "carol");
        assert_eq!(updated.email, "carol@corp.com");
        assert_eq!(updated.age, Some(34));
        assert_eq!(updated.status, AccountStatus::Suspended);
    }

    #[test]
    fn test_update_customer_ignores_admin_accounts() {
        let (store, service) = setup();
        let staff = admin("dave");
        store.save_account(&staff).unwrap();

        assert!(matches!(
            service.update_customer(staff.id, UpdateCustomer::default()),
            Err(CrmError::NotFound(_))
        ));
        assert!(matches!(
            service.update_customer(Uuid::new_v4(), UpdateCustomer::default()),
            Err(CrmError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_customer_cascades_dependents() {
        let (store, service) = setup();
        let target = Account::new_customer("erin", "erin@test.com", "hash");
        store.save_account(&target).unwrap();
        let bystander = Account::new_customer("frank", "frank@test.com", "hash");
        store.save_account(&bystander).unwrap();

        for subject in ["Call", "Email"] {
            store
                .save_interaction(&InteractionRecord::new(target.id, subject))
                .unwrap();
        }
        store
            .save_notification(&Notification::new(target.id, "Welcome"))
            .unwrap();
        for title in ["A", "B", "C"] {
            store
                .save_proposal(&CampaignProposal::new(target.id, title))
                .unwrap();
        }
        store
            .save_interaction(&InteractionRecord::new(bystander.id, "Chat"))
            .unwrap();

        service.delete_customer(target.id).unwrap();

        assert!(store.find_account(target.id).unwrap().is_none());
        assert_eq!(store.count_interactions().unwrap(), 1);
        assert!(store
            .notifications_for_account(target.id)
            .unwrap()
            .is_empty());
        assert!(store
            .proposals_by_status(ReviewStatus::Pending)
            .unwrap()
            .iter()
            .all(|p| p.customer_id == bystander.id));
        assert!(store.find_account(bystander.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_customer_requires_customer_role() {
        let (store, service) = setup();
        let staff = admin("gina");
        store.save_account(&staff).unwrap();

        assert!(matches!(
            service.delete_customer(staff.id),
            Err(CrmError::NotFound(_))
        ));
        assert!(store.find_account(staff.id).unwrap().is_some());
    }

    #[test]
    fn test_failed_cascade_restores_everything() {
        let store = Arc::new(FaultyDatastore::new());
        let mailer = Arc::new(EmailService::new(
            Arc::new(RecordingTransport::new()),
            MailConfig::default(),
        ));
        let service = AdminService::new(
            store.clone(),
            mailer,
            Arc::new(Sha256PasswordHasher::new()),
            PaginationConfig::default(),
        );

        let target = Account::new_customer("hank", "hank@test.com", "hash");
        store.save_account(&target).unwrap();
        store
            .save_interaction(&InteractionRecord::new(target.id, "Call"))
            .unwrap();
        store
            .save_interaction(&InteractionRecord::new(target.id, "Email"))
            .unwrap();

        store.fail_on("delete_notifications_for_account");
        assert!(service.delete_customer(target.id).is_err());

        store.clear_fault();
        assert!(store.find_account(target.id).unwrap().is_some());
        assert_eq!(store.count_interactions().unwrap(), 2);
    }
}
