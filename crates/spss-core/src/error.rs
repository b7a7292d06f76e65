//! Error types for SPSS Connect services
//!
//! Provides error handling for:
//! - Access control denials
//! - Backend and identity provider failures
//! - Configuration loading
//! - JSON import and report export

use crate::messages;
use spss_access::AccessError;
use spss_store::{AuthError, StoreError};
use std::path::PathBuf;

/// Main service error type
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Role may not perform the action
    #[error("access denied: {0}")]
    Access(#[from] AccessError),

    /// Document store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Identity provider failed
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Import rejected
    #[error("import error: {0}")]
    Import(#[from] ImportError),

    /// Report could not be produced
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Required input left blank
    #[error("missing required fields")]
    MissingFields,

    /// Role string is not a known role
    #[error("unknown role: {0}")]
    InvalidRole(String),

    /// No record id given
    #[error("no record id")]
    NoRecordId,

    /// Record does not exist
    #[error("record not found: {0}")]
    RecordNotFound(String),
}

impl ConnectError {
    /// Message shown to the person using the app
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Access(e) => e.user_message().to_string(),
            Self::Store(StoreError::PermissionDenied { .. }) => {
                messages::PERMISSION_DENIED.to_string()
            }
            Self::Store(StoreError::NotFound { .. }) | Self::RecordNotFound(_) => {
                messages::RECORD_NOT_FOUND.to_string()
            }
            Self::Store(_) => messages::RECORD_LOAD_FAIL.to_string(),
            Self::Auth(e) => e.user_message().to_string(),
            Self::Config(e) => e.to_string(),
            Self::Import(e) => e.user_message(),
            Self::Report(e) => e.user_message(),
            Self::MissingFields => messages::FILL_ALL_FIELDS.to_string(),
            Self::InvalidRole(role) => format!("Unknown role: {role}"),
            Self::NoRecordId => messages::NO_RECORD_ID.to_string(),
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }

    /// Whether the backend refused for lack of permission
    #[inline]
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::Access(_) | Self::Store(StoreError::PermissionDenied { .. })
        )
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML did not parse
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create range error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// JSON import errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// Neither pasted text nor a file
    #[error("no JSON data provided")]
    NoData,

    /// Text is not JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Every record failed the shape check
    #[error("all {invalid} record(s) failed validation")]
    NoValidRecords { invalid: usize },
}

impl ImportError {
    /// Message shown to the person importing
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoData => messages::IMPORT_NO_DATA.to_string(),
            Self::InvalidJson(_) => messages::IMPORT_INVALID_JSON.to_string(),
            Self::NoValidRecords { invalid } => {
                format!("All {invalid} record(s) failed validation.")
            }
        }
    }
}

/// Report export errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Nothing to export
    #[error("no records to export{}", .sabha.as_ref().map(|s| format!(" for {s}")).unwrap_or_default())]
    NoRecords { sabha: Option<String> },

    /// Renderer could not write output
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report name would place output outside the target directory
    #[error("unsafe report file name {name:?}")]
    UnsafeName { name: String },
}

impl ReportError {
    /// Message shown to the person exporting
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoRecords { sabha: Some(sabha) } => format!("{} ({sabha})", messages::NO_RECORDS),
            Self::NoRecords { sabha: None } => messages::PDF_NO_RECORDS.to_string(),
            Self::Io { .. } | Self::UnsafeName { .. } => messages::PDF_FAIL.to_string(),
        }
    }
}
