//! Error types for the backend boundary
//!
//! - Document store failures (missing documents, denied rules, I/O)
//! - Identity provider failures, carried as provider error codes

use std::path::PathBuf;

/// Document store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document does not exist
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Backend security rules rejected the request
    #[error("permission denied on {collection}")]
    PermissionDenied { collection: String },

    /// Backend unavailable or failed
    #[error("backend error: {0}")]
    Backend(String),

    /// Document body could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file could not be read or written
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create not-found error
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

/// Error codes reported by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    UserNotFound,
    WrongPassword,
    WeakPassword,
    TooManyRequests,
    InvalidCredential,
}

/// Shown when a code has no friendly message
pub const AUTH_GENERIC_MESSAGE: &str = "An authentication error occurred. Please try again.";

impl AuthErrorCode {
    const ALL: [AuthErrorCode; 7] = [
        AuthErrorCode::EmailAlreadyInUse,
        AuthErrorCode::InvalidEmail,
        AuthErrorCode::UserNotFound,
        AuthErrorCode::WrongPassword,
        AuthErrorCode::WeakPassword,
        AuthErrorCode::TooManyRequests,
        AuthErrorCode::InvalidCredential,
    ];

    /// Provider code string
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmailAlreadyInUse => "auth/email-already-in-use",
            Self::InvalidEmail => "auth/invalid-email",
            Self::UserNotFound => "auth/user-not-found",
            Self::WrongPassword => "auth/wrong-password",
            Self::WeakPassword => "auth/weak-password",
            Self::TooManyRequests => "auth/too-many-requests",
            Self::InvalidCredential => "auth/invalid-credential",
        }
    }

    /// Parse a provider code string
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Message for the person signing in
    #[must_use]
    pub fn friendly_message(&self) -> &'static str {
        match self {
            Self::EmailAlreadyInUse => "This email is already registered.",
            Self::InvalidEmail => "Invalid email address.",
            Self::UserNotFound => "No account found with this email.",
            Self::WrongPassword => "Incorrect password.",
            Self::WeakPassword => "Password must be at least 6 characters.",
            Self::TooManyRequests => "Too many attempts. Please try again later.",
            Self::InvalidCredential => {
                "Invalid credentials. Please check your email and password."
            }
        }
    }
}

/// Friendly message for a raw provider code, falling back to the generic one
#[must_use]
pub fn friendly_auth_message(code: &str) -> &'static str {
    AuthErrorCode::from_code(code).map_or(AUTH_GENERIC_MESSAGE, |c| c.friendly_message())
}

/// Identity provider errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Provider rejected the request
    #[error("{}: {}", .0.code(), .0.friendly_message())]
    Provider(AuthErrorCode),

    /// No signed-in user where one is required
    #[error("not signed in")]
    NotSignedIn,

    /// Provider unavailable or failed
    #[error("identity backend error: {0}")]
    Backend(String),
}

impl AuthError {
    /// Message for the person signing in
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Provider(code) => code.friendly_message(),
            Self::NotSignedIn | Self::Backend(_) => AUTH_GENERIC_MESSAGE,
        }
    }

    /// Provider code, if any
    #[must_use]
    pub fn code(&self) -> Option<AuthErrorCode> {
        match self {
            Self::Provider(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<AuthErrorCode> for AuthError {
    fn from(code: AuthErrorCode) -> Self {
        Self::Provider(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in AuthErrorCode::ALL {
            assert_eq!(AuthErrorCode::from_code(code.code()), Some(code));
        }
    }

    #[test]
    fn unknown_code_uses_generic_message() {
        assert_eq!(friendly_auth_message("auth/network-request-failed"), AUTH_GENERIC_MESSAGE);
        assert_eq!(friendly_auth_message("auth/wrong-password"), "Incorrect password.");
    }

    #[test]
    fn error_display() {
        let err = AuthError::from(AuthErrorCode::WeakPassword);
        assert!(err.to_string().contains("auth/weak-password"));
        assert_eq!(err.user_message(), "Password must be at least 6 characters.");
        assert!(StoreError::Backend("x".into()).is_retryable());
        assert!(!StoreError::not_found("c", "i").is_retryable());
    }
}
