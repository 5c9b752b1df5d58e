//! The system settings singleton.
//!
//! Settings live under one fixed key, [`SETTINGS_ID`]. Reads bootstrap the
//! row with defaults when it is missing, and writes are forced onto the
//! fixed key so a tampered id can never mint a second row.

use tracing::{debug, info};

use crm_core::types::{SystemSettings, SETTINGS_ID};
use crm_core::CrmResult;
use crm_store::Datastore;

use crate::service::AdminService;

impl<S: Datastore> AdminService<S> {
    /// Fetch the settings singleton, writing defaults on first access.
    pub fn system_settings(&self) -> CrmResult<SystemSettings> {
        self.store.with_transaction(|s| {
            if let Some(settings) = s.find_settings(SETTINGS_ID)? {
                return Ok(settings);
            }
            debug!("Settings singleton missing, writing defaults");
            s.save_settings(&SystemSettings::default())
        })
    }

    /// Overwrite the settings singleton. The id on the request is ignored.
    pub fn update_system_settings(
        &self,
        mut settings: SystemSettings,
    ) -> CrmResult<SystemSettings> {
        settings.id = SETTINGS_ID;
        let saved = self.store.with_transaction(|s| s.save_settings(&settings))?;
        info!("System settings updated");
        Ok(saved)
    }
}
