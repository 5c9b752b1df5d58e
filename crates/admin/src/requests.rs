//! Caller-supplied parameter structs for admin operations.

use serde::{Deserialize, Serialize};

use crm_core::types::{AccountStatus, EmailCampaignStatus};

/// Payload for creating a customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub address: Option<String>,
}

/// Field updates for a customer account; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomer {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub address: Option<String>,
    pub status: Option<AccountStatus>,
}

/// Field updates for an admin profile; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdminProfile {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
}

/// Credential rotation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

/// Payload for creating an email campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmailCampaign {
    pub name: String,
    pub subject: String,
}

/// Field updates for an email campaign; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmailCampaign {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub status: Option<EmailCampaignStatus>,
}
