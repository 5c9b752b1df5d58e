//! Email campaign catalog maintained by admins.

use tracing::info;
use uuid::Uuid;

use crm_core::types::{EmailCampaign, Page, PageRequest};
use crm_core::{CrmError, CrmResult};
use crm_store::Datastore;

use crate::requests::{NewEmailCampaign, UpdateEmailCampaign};
use crate::service::AdminService;

impl<S: Datastore> AdminService<S> {
    /// Email campaigns, paged and newest first.
    pub fn list_email_campaigns(&self, page: PageRequest) -> CrmResult<Page<EmailCampaign>> {
        self.store
            .list_email_campaigns(self.pagination.clamp(page))
    }

    /// Create a campaign in DRAFT state.
    pub fn create_email_campaign(&self, new: NewEmailCampaign) -> CrmResult<EmailCampaign> {
        let campaign = EmailCampaign::new(new.name, new.subject);
        let saved = self
            .store
            .with_transaction(|s| s.save_email_campaign(&campaign))?;
        info!(campaign_id = %saved.id, name = %saved.name, "Email campaign created");
        Ok(saved)
    }

    /// Apply the populated fields of `changes` to an existing campaign.
    pub fn update_email_campaign(
        &self,
        campaign_id: Uuid,
        changes: UpdateEmailCampaign,
    ) -> CrmResult<EmailCampaign> {
        self.store.with_transaction(|s| {
            let mut campaign = s
                .find_email_campaign(campaign_id)?
                .ok_or_else(|| CrmError::NotFound(format!("email campaign {campaign_id}")))?;

            if let Some(name) = changes.name {
                campaign.name = name;
            }
            if let Some(subject) = changes.subject {
                campaign.subject = subject;
            }
            if let Some(status) = changes.status {
                campaign.status = status;
            }
            s.save_email_campaign(&campaign)
        })
    }

    pub fn delete_email_campaign(&self, campaign_id: Uuid) -> CrmResult<()> {
        self.store.with_transaction(|s| {
            s.find_email_campaign(campaign_id)?
                .ok_or_else(|| CrmError::NotFound(format!("email campaign {campaign_id}")))?;
            s.delete_email_campaign(campaign_id)
        })?;
        info!(campaign_id = %campaign_id, "Email campaign deleted");
        Ok(())
    }
}
