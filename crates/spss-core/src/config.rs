//! Service configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//! Unknown keys are rejected.

use crate::error::ConfigError;
use crate::sort::SortDirection;
use serde::{Deserialize, Serialize};
use spss_store::BATCH_LIMIT;
use std::path::Path;
use std::time::Duration;

/// SPSS Connect configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectConfig {
    /// Dashboard rows per page
    pub page_size: usize,

    /// Documents per import write batch
    pub batch_limit: usize,

    /// Dashboard sort field on first load
    pub default_sort_field: String,

    /// Dashboard sort direction on first load
    pub default_sort_direction: SortDirection,

    /// Report letterhead title
    pub org_name: String,

    /// Report letterhead subtitle
    pub org_subtitle: String,

    /// Emails that become admins on sign-up
    pub admin_emails: Vec<String>,

    /// Origin used to build shareable edit links
    pub share_base_url: String,

    /// How long a fetched role stays cached
    pub role_cache_ttl_secs: u64,
}

impl ConnectConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// With import batch limit
    #[inline]
    #[must_use]
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }

    /// With admin emails
    #[must_use]
    pub fn with_admin_emails<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admin_emails = emails.into_iter().map(Into::into).collect();
        self
    }

    /// With share link origin
    #[inline]
    #[must_use]
    pub fn with_share_base_url(mut self, url: impl Into<String>) -> Self {
        self.share_base_url = url.into();
        self
    }

    /// With letterhead
    #[inline]
    #[must_use]
    pub fn with_org(mut self, name: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.org_name = name.into();
        self.org_subtitle = subtitle.into();
        self
    }

    /// With role cache lifetime
    #[inline]
    #[must_use]
    pub fn with_role_cache_ttl(mut self, secs: u64) -> Self {
        self.role_cache_ttl_secs = secs;
        self
    }

    /// Parse from TOML text and validate
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed TOML and
    /// `ConfigError::Invalid` when a value is out of range
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be greater than 0"));
        }
        if self.batch_limit == 0 || self.batch_limit > BATCH_LIMIT {
            return Err(ConfigError::invalid(
                "batch_limit",
                format!("must be between 1 and {BATCH_LIMIT}"),
            ));
        }
        Ok(())
    }

    /// Whether `email` is on the admin list
    #[must_use]
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| e.to_lowercase() == email)
    }

    /// Role cache lifetime
    #[inline]
    #[must_use]
    pub fn role_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.role_cache_ttl_secs)
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            batch_limit: BATCH_LIMIT,
            default_sort_field: "name".to_string(),
            default_sort_direction: SortDirection::Asc,
            org_name: "SPSS Connect".to_string(),
            org_subtitle: "Household Census Records".to_string(),
            admin_emails: Vec::new(),
            share_base_url: "http://localhost:8080".to_string(),
            role_cache_ttl_secs: 300,
        }
    }
}
