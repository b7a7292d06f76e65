//! In-process identity provider
//!
//! - Accounts keyed by lower-cased email
//! - Passwords stored as salted SHA-256 digests (hex)
//! - Sign-in lock-out after repeated failures
//! - One current-user slot, like a browser session

use crate::error::{AuthError, AuthErrorCode};
use crate::traits::{AuthUser, IdentityProvider};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use spss_model::contact::is_email;
use spss_model::UserId;
use tracing::{info, warn};

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Consecutive failures before sign-in is refused
pub const MAX_FAILED_SIGN_INS: u32 = 5;

/// How long a lock-out lasts
pub const LOCKOUT_MINUTES: i64 = 5;

/// Stored account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub uid: UserId,
    pub email: String,
    pub password_digest: String,
}

impl Account {
    fn matches(&self, password: &str) -> bool {
        digest(&self.uid, password) == self.password_digest
    }

    fn user(&self) -> AuthUser {
        AuthUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Failures {
    count: u32,
    last: DateTime<Utc>,
}

/// In-memory [`IdentityProvider`]
#[derive(Debug, Default)]
pub struct MemoryIdentityProvider {
    accounts: DashMap<String, Account>,
    failures: DashMap<String, Failures>,
    current: RwLock<Option<AuthUser>>,
}

impl MemoryIdentityProvider {
    /// Create provider with no accounts
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create provider from stored accounts
    #[must_use]
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let provider = Self::new();
        for account in accounts {
            provider.accounts.insert(normalize(&account.email), account);
        }
        provider
    }

    /// Stored accounts, ordered by email
    #[must_use]
    pub fn accounts(&self) -> Vec<Account> {
        let mut all: Vec<Account> = self.accounts.iter().map(|a| a.value().clone()).collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        all
    }

    fn locked(&self, key: &str, now: DateTime<Utc>) -> bool {
        let Some(failures) = self.failures.get(key).map(|f| *f) else {
            return false;
        };
        if now - failures.last >= Duration::minutes(LOCKOUT_MINUTES) {
            self.failures.remove(key);
            return false;
        }
        failures.count >= MAX_FAILED_SIGN_INS
    }

    fn record_failure(&self, key: &str, now: DateTime<Utc>) {
        let mut entry = self
            .failures
            .entry(key.to_string())
            .or_insert(Failures { count: 0, last: now });
        entry.count += 1;
        entry.last = now;
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        if !is_email(email.trim()) {
            return Err(AuthErrorCode::InvalidEmail.into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthErrorCode::WeakPassword.into());
        }

        let key = normalize(email);
        let uid = UserId::generate();
        let account = Account {
            password_digest: digest(&uid, password),
            uid,
            email: email.trim().to_string(),
        };

        match self.accounts.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(AuthErrorCode::EmailAlreadyInUse.into())
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let user = account.user();
                slot.insert(account);
                info!(uid = %user.uid, "account created");
                Ok(user)
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        if !is_email(email.trim()) {
            return Err(AuthErrorCode::InvalidEmail.into());
        }
        let key = normalize(email);
        let now = Utc::now();
        if self.locked(&key, now) {
            warn!("sign-in refused while locked out");
            return Err(AuthErrorCode::TooManyRequests.into());
        }

        let account = self
            .accounts
            .get(&key)
            .map(|a| a.value().clone())
            .ok_or(AuthError::Provider(AuthErrorCode::UserNotFound))?;

        if !account.matches(password) {
            self.record_failure(&key, now);
            return Err(AuthErrorCode::WrongPassword.into());
        }

        self.failures.remove(&key);
        let user = account.user();
        *self.current.write() = Some(user.clone());
        info!(uid = %user.uid, "signed in");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(user) = self.current.write().take() {
            info!(uid = %user.uid, "signed out");
        }
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.read().clone()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn digest(uid: &UserId, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uid.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_sign_in() {
        let idp = MemoryIdentityProvider::new();
        let created = idp.create_user("Asha@Example.com", "secret1").await.unwrap();
        assert!(idp.current_user().is_none());

        let signed_in = idp.sign_in("asha@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);
        assert_eq!(idp.current_user(), Some(signed_in));

        idp.sign_out().await.unwrap();
        assert!(idp.current_user().is_none());
    }

    #[tokio::test]
    async fn provider_error_codes() {
        let idp = MemoryIdentityProvider::new();
        let code = |r: Result<AuthUser, AuthError>| r.unwrap_err().code();

        assert_eq!(code(idp.create_user("not-an-email", "secret1").await), Some(AuthErrorCode::InvalidEmail));
        assert_eq!(code(idp.create_user("a@b.in", "12345").await), Some(AuthErrorCode::WeakPassword));
        idp.create_user("a@b.in", "123456").await.unwrap();
        assert_eq!(code(idp.create_user("A@B.in", "123456").await), Some(AuthErrorCode::EmailAlreadyInUse));
        assert_eq!(code(idp.sign_in("x@b.in", "123456").await), Some(AuthErrorCode::UserNotFound));
        assert_eq!(code(idp.sign_in("a@b.in", "wrong!").await), Some(AuthErrorCode::WrongPassword));
    }

    #[tokio::test]
    async fn locks_out_after_repeated_failures() {
        let idp = MemoryIdentityProvider::new();
        idp.create_user("a@b.in", "123456").await.unwrap();
        for _ in 0..MAX_FAILED_SIGN_INS {
            let _ = idp.sign_in("a@b.in", "nope-nope").await;
        }

        let err = idp.sign_in("a@b.in", "123456").await.unwrap_err();
        assert_eq!(err.code(), Some(AuthErrorCode::TooManyRequests));
    }

    #[tokio::test]
    async fn success_resets_failures() {
        let idp = MemoryIdentityProvider::new();
        idp.create_user("a@b.in", "123456").await.unwrap();
        for _ in 0..MAX_FAILED_SIGN_INS - 1 {
            let _ = idp.sign_in("a@b.in", "nope-nope").await;
        }
        idp.sign_in("a@b.in", "123456").await.unwrap();
        let _ = idp.sign_in("a@b.in", "nope-nope").await;
        assert!(idp.sign_in("a@b.in", "123456").await.is_ok());
    }

    #[test]
    fn digests_are_salted() {
        let a = digest(&UserId::from("u1"), "pw");
        let b = digest(&UserId::from("u2"), "pw");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn restores_accounts() {
        let account = Account {
            uid: UserId::from("u1"),
            email: "Asha@example.com".into(),
            password_digest: digest(&UserId::from("u1"), "secret1"),
        };
        let idp = MemoryIdentityProvider::from_accounts([account.clone()]);
        assert_eq!(idp.accounts(), vec![account]);
    }
}
