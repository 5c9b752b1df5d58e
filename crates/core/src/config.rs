use serde::Deserialize;

use crate::types::PageRequest;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CRM_PORTAL__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_mail_enabled")]
    pub enabled: bool,
    #[serde(default = "default_from_email")]
    pub from_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl PaginationConfig {
    /// Resolve a caller-supplied page request against the configured bounds.
    pub fn clamp(&self, req: PageRequest) -> PageRequest {
        let size = if req.size == 0 {
            self.default_page_size
        } else {
            req.size.min(self.max_page_size)
        };
        PageRequest::new(req.page, size)
    }
}

// Default functions
fn default_mail_enabled() -> bool {
    true
}
fn default_from_email() -> String {
    "noreply@crm-app.com".to_string()
}
fn default_page_size() -> u32 {
    20
}
fn default_max_page_size() -> u32 {
    100
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: default_mail_enabled(),
            from_email: default_from_email(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mail: MailConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CRM_PORTAL")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
