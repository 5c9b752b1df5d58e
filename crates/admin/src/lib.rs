//! Administrative service layer for the CRM Portal backend.
//!
//! The core is the approval workflow engine: account approval and
//! rejection, campaign proposal and interaction review, the cascading
//! customer delete, and the settings singleton. Supporting operations
//! (customer directory, email campaigns, analytics, admin profiles) ride
//! on the same service and stores.
//!
//! # Modules
//! - `service` — the `AdminService` wiring over injected collaborators
//! - `approvals` — the workflow transitions and their side effects
//! - `customers` — directory CRUD and the cascading delete
//! - `campaigns` — email-campaign CRUD
//! - `settings` — the settings singleton
//! - `profile` — admin profile and credential rotation
//! - `analytics` — dashboard counters
//! - `auth` — password hashing seam
//! - `requests` — caller-supplied parameter structs

pub mod analytics;
pub mod approvals;
pub mod auth;
pub mod campaigns;
pub mod customers;
pub mod profile;
pub mod requests;
pub mod service;
pub mod settings;

pub use auth::{PasswordHasher, Sha256PasswordHasher};
pub use service::AdminService;
