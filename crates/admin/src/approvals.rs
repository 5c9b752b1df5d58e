//! The approval workflow engine: account approval and rejection, campaign
//! proposal review, and interaction review.
//!
//! Review transitions couple a status write to a notification write inside
//! one unit of work, notification first. Approval and rejection couple the
//! account write to a courtesy email sent only after the unit of work
//! commits; delivery failures never undo the transition.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crm_core::types::{
    Account, AccountStatus, CampaignProposal, InteractionRecord, Notification, Page, PageRequest,
    ReviewStatus, Role,
};
use crm_core::{CrmError, CrmResult};
use crm_store::Datastore;

use crate::service::AdminService;

impl<S: Datastore> AdminService<S> {
    /// Customer accounts waiting in the approval queue.
    pub fn pending_customers(&self, page: PageRequest) -> CrmResult<Page<Account>> {
        self.store.accounts_by_role_and_status(
            Role::Customer,
            AccountStatus::Pending,
            self.pagination.clamp(page),
        )
    }

    /// Approve a PENDING customer account: set it ACTIVE and email the
    /// customer.
    pub fn approve_customer(&self, customer_id: Uuid) -> CrmResult<Account> {
        let approved = self.store.with_transaction(|s| {
            let mut account = s
                .find_account(customer_id)?
                .filter(|a| a.status == AccountStatus::Pending)
                .ok_or_else(|| CrmError::NotFound(format!("pending customer {customer_id}")))?;
            account.status = AccountStatus::Active;
            s.save_account(&account)
        })?;

        info!(customer_id = %approved.id, "Customer account approved");
        metrics::counter!("admin.customers_approved").increment(1);
        self.mailer.send_simple_message(
            &approved.email,
            "Account Approved",
            "Your account on the CRM Portal has been approved. You can now log in.",
        );
        Ok(approved)
    }

    /// Reject a PENDING customer account: delete it and email the address
    /// captured before deletion.
    pub fn reject_customer(&self, customer_id: Uuid) -> CrmResult<()> {
        let email = self.store.with_transaction(|s| {
            let account = s
                .find_account(customer_id)?
                .filter(|a| a.status == AccountStatus::Pending)
                .ok_or_else(|| CrmError::NotFound(format!("pending customer {customer_id}")))?;
            let email = account.email.clone();
            s.delete_account(account.id)?;
            Ok(email)
        })?;

        info!(customer_id = %customer_id, "Customer registration rejected");
        metrics::counter!("admin.customers_rejected").increment(1);
        self.mailer.send_simple_message(
            &email,
            "Account Update",
            "We regret to inform you that your registration for the CRM Portal has been rejected.",
        );
        Ok(())
    }

    /// Campaign proposals waiting for review.
    pub fn pending_proposals(&self) -> CrmResult<Vec<CampaignProposal>> {
        self.store.proposals_by_status(ReviewStatus::Pending)
    }

    /// Review a campaign proposal: canonicalize the requested status, stamp
    /// the review time, and notify the owning customer.
    pub fn review_proposal(
        &self,
        proposal_id: Uuid,
        requested_status: &str,
    ) -> CrmResult<CampaignProposal> {
        let status: ReviewStatus = requested_status.parse()?;

        let reviewed = self.store.with_transaction(|s| {
            let mut proposal = s
                .find_proposal(proposal_id)?
                .ok_or_else(|| CrmError::NotFound(format!("campaign proposal {proposal_id}")))?;
            let owner = s
                .find_account(proposal.customer_id)?
                .ok_or_else(|| CrmError::NotFound(format!("customer {}", proposal.customer_id)))?;

            proposal.status = status;
            proposal.reviewed_at = Some(Utc::now());

            let message = format!(
                "Your campaign proposal '{}' has been {} by the admin.",
                proposal.title,
                status.as_lower()
            );
            s.save_notification(&Notification::new(owner.id, message))?;
            s.save_proposal(&proposal)
        })?;

        info!(
            proposal_id = %reviewed.id,
            status = %status,
            "Campaign proposal reviewed"
        );
        metrics::counter!("admin.proposals_reviewed", "status" => status.as_str()).increment(1);
        Ok(reviewed)
    }

    /// Interaction records waiting for review.
    pub fn pending_interactions(&self, page: PageRequest) -> CrmResult<Page<InteractionRecord>> {
        self.store
            .interactions_by_status(ReviewStatus::Pending, self.pagination.clamp(page))
    }

    /// Review an interaction record. Same contract as [`Self::review_proposal`],
    /// except interactions carry no review timestamp.
    pub fn review_interaction(
        &self,
        interaction_id: Uuid,
        requested_status: &str,
    ) -> CrmResult<InteractionRecord> {
        let status: ReviewStatus = requested_status.parse()?;

        let reviewed = self.store.with_transaction(|s| {
            let mut interaction = s
                .find_interaction(interaction_id)?
                .ok_or_else(|| CrmError::NotFound(format!("interaction {interaction_id}")))?;
            let owner = s.find_account(interaction.customer_id)?.ok_or_else(|| {
                CrmError::NotFound(format!("customer {}", interaction.customer_id))
            })?;

            interaction.status = status;

            let message = format!(
                "Admin has reviewed your interaction '{}'. New status: {}",
                interaction.subject,
                status.as_lower()
            );
            s.save_notification(&Notification::new(owner.id, message))?;
            s.save_interaction(&interaction)
        })?;

        info!(
            interaction_id = %reviewed.id,
            status = %status,
            "Interaction reviewed"
        );
        metrics::counter!("admin.interactions_reviewed", "status" => status.as_str()).increment(1);
        Ok(reviewed)
    }
}
