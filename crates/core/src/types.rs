//! Core entities and status vocabulary for the CRM Portal admin backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CrmError, CrmResult};

// ─── Accounts ───────────────────────────────────────────────────────────────

/// Account role. Fixed at creation; no admin operation reassigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Admin,
}

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Pending,
    Active,
    Inactive,
    Suspended,
}

/// A portal account: customers under review or active, plus admin staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl Account {
    /// New customer account with empty profile fields. Admin-created
    /// customers start ACTIVE; only self-registration produces PENDING.
    pub fn new_customer(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: Role::Customer,
            status: AccountStatus::Active,
            phone: None,
            age: None,
            address: None,
            department: None,
            position: None,
            bio: None,
            joined_at: Utc::now(),
        }
    }
}

// ─── Review workflow ────────────────────────────────────────────────────────

/// Review state shared by campaign proposals and interaction records.
///
/// Persisted and serialized in canonical upper case. Parsing is
/// case-insensitive, so `"approved"`, `"Approved"` and `"APPROVED"` all
/// canonicalize to the same variant; anything outside the closed set is
/// refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// Canonical persisted form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "PENDING",
            ReviewStatus::Approved => "APPROVED",
            ReviewStatus::Rejected => "REJECTED",
        }
    }

    /// Lower-case form used in notification text.
    pub fn as_lower(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = CrmError;

    fn from_str(input: &str) -> CrmResult<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(ReviewStatus::Pending),
            "APPROVED" => Ok(ReviewStatus::Approved),
            "REJECTED" => Ok(ReviewStatus::Rejected),
            other => Err(CrmError::InvalidArgument(format!(
                "unknown review status: {other}"
            ))),
        }
    }
}

/// A campaign idea submitted by a customer and reviewed by an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignProposal {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub title: String,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
    /// Stamped on every review pass. Interaction records carry no
    /// equivalent field.
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl CampaignProposal {
    pub fn new(customer_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            title: title.into(),
            status: ReviewStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
        }
    }
}

/// A customer touchpoint record awaiting admin review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub subject: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(customer_id: Uuid, subject: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            subject: subject.into(),
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

// ─── Notifications ──────────────────────────────────────────────────────────

/// In-app message for an account. Written only as a review side effect,
/// never directly by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub account_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(account_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

// ─── System settings ────────────────────────────────────────────────────────

/// Fixed identity of the settings singleton. Every write lands on this key.
pub const SETTINGS_ID: Uuid = Uuid::nil();

/// Singleton configuration record: three opaque JSON blobs edited as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub id: Uuid,
    pub general_settings: String,
    pub email_settings: String,
    pub security_settings: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            id: SETTINGS_ID,
            general_settings: "{}".to_string(),
            email_settings: "{}".to_string(),
            security_settings: "{}".to_string(),
        }
    }
}

// ─── Email campaigns ────────────────────────────────────────────────────────

/// Outbound marketing campaign status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailCampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Sent,
}

/// Outbound marketing campaign managed by admins. Plain CRUD; not part of
/// the review workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailCampaign {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub status: EmailCampaignStatus,
    pub created_at: DateTime<Utc>,
}

impl EmailCampaign {
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            subject: subject.into(),
            status: EmailCampaignStatus::Draft,
            created_at: Utc::now(),
        }
    }
}

// ─── Paging ─────────────────────────────────────────────────────────────────

/// 0-based page request. A size of 0 means "use the configured default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }
}

/// One page of results plus the total row count behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            0
        } else {
            ((self.total + self.size as u64 - 1) / self.size as u64) as u32
        }
    }
}

// ─── Analytics ──────────────────────────────────────────────────────────────

/// Dashboard counter snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAnalytics {
    pub total_customers: u64,
    pub active_customers: u64,
    pub total_interactions: u64,
    pub conversion_rate: u8,
}
