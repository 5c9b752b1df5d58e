//! Admin self-service: profile viewing and editing, password changes.

use tracing::info;

use crm_core::types::Account;
use crm_core::{CrmError, CrmResult};
use crm_store::Datastore;

use crate::requests::{ChangePassword, UpdateAdminProfile};
use crate::service::AdminService;

impl<S: Datastore> AdminService<S> {
    /// Look up a staff account by username. No role filter: staff accounts
    /// are found by name however they were provisioned.
    pub fn admin_profile(&self, username: &str) -> CrmResult<Account> {
        self.store
            .find_account_by_username(username)?
            .ok_or_else(|| CrmError::NotFound(format!("admin {username}")))
    }

    /// Apply the populated fields of `changes` to the named account.
    pub fn update_admin_profile(
        &self,
        username: &str,
        changes: UpdateAdminProfile,
    ) -> CrmResult<Account> {
        let updated = self.store.with_transaction(|s| {
            let mut account = s
                .find_account_by_username(username)?
                .ok_or_else(|| CrmError::NotFound(format!("admin {username}")))?;

            if let Some(email) = changes.email {
                account.email = email;
            }
            if let Some(phone) = changes.phone {
                account.phone = Some(phone);
            }
            if let Some(department) = changes.department {
                account.department = Some(department);
            }
            if let Some(position) = changes.position {
                account.position = Some(position);
            }
            if let Some(bio) = changes.bio {
                account.bio = Some(bio);
            }
            s.save_account(&account)
        })?;

        info!(username = %username, "Admin profile updated");
        Ok(updated)
    }

    /// Change the named account's password after verifying the current one.
    pub fn change_admin_password(&self, username: &str, change: ChangePassword) -> CrmResult<()> {
        self.store.with_transaction(|s| {
            let mut account = s
                .find_account_by_username(username)?
                .ok_or_else(|| CrmError::NotFound(format!("admin {username}")))?;

            if !self
                .hasher
                .verify(&change.current_password, &account.password_hash)
            {
                return Err(CrmError::InvalidArgument(
                    "current password is incorrect".into(),
                ));
            }
            account.password_hash = self.hasher.hash(&change.new_password);
            s.save_account(&account)?;
            Ok(())
        })?;

        info!(username = %username, "Admin password changed");
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
    use crm_core::types::Role;
    use crm_store::{AccountStore, MemoryDatastore};

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

    fn seed_admin(store: &MemoryDatastore, username: &str, password: &str) -> Account {
        let hash = Sha256PasswordHasher::new().hash(password);
        let mut account = Account::new_customer(username, format!("{username}@test.com"), hash);
        account.role = Role::Admin;
        store.save_account(&account).unwrap()
    }

    #[test]
    fn test_profile_lookup_by_username() {
        let (store, service) = setup();
        seed_admin(&store, "root", "secret");

        assert_eq!(service.admin_profile("root").unwrap().username, "root");
        assert!(matches!(
            service.admin_profile("ghost"),
            Err(CrmError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_profile_merges_populated_fields() {
        let (store, service) = setup();
        seed_admin(&store, "root", "secret");

        let updated = service
            .update_admin_profile(
                "root",
                UpdateAdminProfile {
                    department: Some("Operations".to_string()),
                    bio: Some("On call".to_string()),
                    ..UpdateAdminProfile::default()
                },
            )
            .unwrap();
        assert_eq!(updated.email, "root@test.com");
        assert_eq!(updated.department.as_deref(), Some("Operations"));
        assert_eq!(updated.bio.as_deref(), Some("On call"));
    }

    #[test]
    fn test_change_password_rejects_wrong_current() {
        let (store, service) = setup();
        let admin = seed_admin(&store, "root", "secret");

        let result = service.change_admin_password(
            "root",
            ChangePassword {
                current_password: "wrong".to_string(),
                new_password: "next".to_string(),
            },
        );
        assert!(matches!(result, Err(CrmError::InvalidArgument(_))));
        assert_eq!(
            store
                .find_account(admin.id)
                .unwrap()
                .unwrap()
                .password_hash,
            admin.password_hash
        );
    }

    #[test]
    fn test_change_password_rehashes() {
        let (store, service) = setup();
        let admin = seed_admin(&store, "root", "secret");

        service
            .change_admin_password(
                "root",
                ChangePassword {
                    current_password: "secret".to_string(),
                    new_password: "next".to_string(),
                },
            )
            .unwrap();

        let stored = store.find_account(admin.id).unwrap().unwrap();
        let hasher = Sha256PasswordHasher::new();
        assert!(hasher.verify("next", &stored.password_hash));
        assert!(!hasher.verify("secret", &stored.password_hash));
    }
}
