//! Persistence layer: per-aggregate store traits, the unit-of-work
//! contract, and the in-memory development backend.

pub mod memory;
pub mod stores;
pub mod testing;

pub use memory::MemoryDatastore;
pub use stores::{
    AccountStore, CampaignProposalStore, Datastore, EmailCampaignStore, InteractionStore,
    NotificationStore, SettingsStore,
};
