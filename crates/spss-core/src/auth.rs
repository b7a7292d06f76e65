//! Sessions and account lifecycle
//!
//! - Register / sign in / sign out through the identity provider
//! - `users/{uid}` profile documents carry the role and sabha scope
//! - Profiles are read through a TTL cache keyed by uid

use crate::config::ConnectConfig;
use crate::error::ConnectError;
use chrono::Utc;
use moka::future::Cache;
use spss_access::{ensure_action, Action, Viewer};
use spss_model::{Role, UserId, UserProfile, USERS};
use spss_store::{AuthUser, DocumentStore, IdentityProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Who is signed in and what their profile says
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Signed-in account
    pub user: Option<AuthUser>,
    /// Profile document, when one exists
    pub profile: Option<UserProfile>,
}

impl Session {
    /// Signed-out session
    #[inline]
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session for a signed-in account
    #[inline]
    #[must_use]
    pub fn signed_in(user: AuthUser, profile: Option<UserProfile>) -> Self {
        Self {
            user: Some(user),
            profile,
        }
    }

    /// Effective role
    ///
    /// Guest when signed out; `user` for an account without a profile.
    #[must_use]
    pub fn role(&self) -> Role {
        match (&self.user, &self.profile) {
            (None, _) => Role::Guest,
            (Some(_), Some(profile)) => profile.role,
            (Some(_), None) => Role::User,
        }
    }

    /// Admin or super admin
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    /// Super admin
    #[inline]
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role() == Role::SuperAdmin
    }

    /// Whether an account is signed in
    #[inline]
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Sabha the profile is scoped to
    #[must_use]
    pub fn pradeshika_sabha(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.pradeshika_sabha.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Signed-in uid, or `fallback`
    #[must_use]
    pub fn uid_or(&self, fallback: &str) -> String {
        self.user
            .as_ref()
            .map_or_else(|| fallback.to_string(), |u| u.uid.to_string())
    }

    /// Signed-in email
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }

    /// Viewer for the route gate
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        match &self.user {
            Some(user) => Viewer::signed_in(user.email.clone(), self.role()),
            None => Viewer::guest(),
        }
    }

    /// Fail unless the session's role may perform `action`
    ///
    /// # Errors
    /// Returns `ConnectError::Access` when the role lacks the action
    pub fn require(&self, action: Action) -> Result<(), ConnectError> {
        ensure_action(self.role(), action).map_err(ConnectError::from)
    }
}

/// Account and session service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    config: Arc<ConnectConfig>,
    profiles: Cache<UserId, UserProfile>,
}

impl AuthService {
    /// Create service over the given backends
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: Arc<ConnectConfig>,
    ) -> Self {
        let profiles = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(config.role_cache_ttl())
            .build();
        Self {
            store,
            identity,
            config,
            profiles,
        }
    }

    fn initial_role(&self, email: &str) -> Role {
        if self.config.is_admin_email(email) {
            Role::Admin
        } else {
            Role::User
        }
    }

    async fn write_profile(&self, uid: &UserId, profile: &UserProfile) -> Result<(), ConnectError> {
        let body = serde_json::to_value(profile).map_err(spss_store::StoreError::from)?;
        self.store.set(USERS, uid.as_str(), body).await?;
        self.profiles.invalidate(uid).await;
        Ok(())
    }

    /// Create an account, sign it in, and write its profile
    ///
    /// # Errors
    /// Returns `ConnectError::Auth` with the provider's code on failure
    pub async fn register(&self, email: &str, password: &str) -> Result<Session, ConnectError> {
        let created = self.identity.create_user(email, password).await?;
        let user = self.identity.sign_in(email, password).await?;
        let profile = UserProfile::new(created.email.clone(), self.initial_role(email), Utc::now());
        self.write_profile(&created.uid, &profile).await?;

        info!(uid = %user.uid, role = %profile.role, "registered");
        Ok(Session::signed_in(user, Some(profile.with_uid(created.uid))))
    }

    /// Sign in, creating the profile if the account has none
    ///
    /// # Errors
    /// Returns `ConnectError::Auth` with the provider's code on failure
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ConnectError> {
        let user = self.identity.sign_in(email, password).await?;

        if self.store.get(USERS, user.uid.as_str()).await?.is_none() {
            let profile = UserProfile::new(user.email.clone(), self.initial_role(email), Utc::now());
            self.write_profile(&user.uid, &profile).await?;
            debug!(uid = %user.uid, "profile created on first sign-in");
        }

        let session = self.fetch_session().await?;
        info!(uid = %user.uid, role = %session.role(), "signed in");
        Ok(session)
    }

    /// Sign out and forget cached roles
    ///
    /// # Errors
    /// Returns `ConnectError::Auth` if the provider fails
    pub async fn logout(&self) -> Result<(), ConnectError> {
        self.identity.sign_out().await?;
        self.clear_role_cache();
        Ok(())
    }

    /// Current session, reading the profile through the role cache
    ///
    /// # Errors
    /// Returns `ConnectError::Store` if the profile cannot be read
    pub async fn fetch_session(&self) -> Result<Session, ConnectError> {
        let Some(user) = self.identity.current_user() else {
            return Ok(Session::anonymous());
        };

        if let Some(profile) = self.profiles.get(&user.uid).await {
            return Ok(Session::signed_in(user, Some(profile)));
        }

        let profile = match self.store.get(USERS, user.uid.as_str()).await? {
            Some(doc) => {
                let profile = doc
                    .decode::<UserProfile>()
                    .map_err(spss_store::StoreError::from)?
                    .with_uid(user.uid.clone());
                self.profiles.insert(user.uid.clone(), profile.clone()).await;
                Some(profile)
            }
            None => None,
        };
        Ok(Session::signed_in(user, profile))
    }

    /// Drop every cached profile
    pub fn clear_role_cache(&self) {
        self.profiles.invalidate_all();
    }

    /// Create an account on behalf of a super admin
    ///
    /// The actor stays signed in.
    ///
    /// # Errors
    /// - `ConnectError::Access` unless the actor may manage users
    /// - `ConnectError::MissingFields` if any input is blank
    /// - `ConnectError::InvalidRole` for an unknown role
    /// - `ConnectError::Auth` with the provider's code
    pub async fn admin_create_user(
        &self,
        actor: &Session,
        email: &str,
        password: &str,
        role: &str,
        sabha: &str,
    ) -> Result<UserProfile, ConnectError> {
        actor.require(Action::ManageUsers)?;

        let (email, role, sabha) = (email.trim(), role.trim(), sabha.trim());
        if email.is_empty() || password.is_empty() || role.is_empty() || sabha.is_empty() {
            return Err(ConnectError::MissingFields);
        }
        let role = Role::parse_strict(role).ok_or_else(|| ConnectError::InvalidRole(role.to_string()))?;

        let created = self.identity.create_user(email, password).await?;
        let profile = UserProfile::new(created.email.clone(), role, Utc::now()).with_sabha(sabha);
        self.write_profile(&created.uid, &profile).await?;

        info!(uid = %created.uid, role = %role, sabha, "user created by admin");
        Ok(profile.with_uid(created.uid))
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("cached_profiles", &self.profiles.entry_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spss_store::{AuthErrorCode, MemoryIdentityProvider, MemoryStore};

    fn service(config: ConnectConfig) -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentityProvider::new());
        (
            AuthService::new(store.clone(), identity, Arc::new(config)),
            store,
        )
    }

    #[test]
    fn session_roles() {
        let user = AuthUser {
            uid: UserId::from("u1"),
            email: "a@b.in".into(),
        };
        assert_eq!(Session::anonymous().role(), Role::Guest);
        assert_eq!(Session::signed_in(user.clone(), None).role(), Role::User);

        let profile = UserProfile::new("a@b.in", Role::Admin, Utc::now()).with_sabha("Aluva");
        let session = Session::signed_in(user, Some(profile));
        assert!(session.is_admin());
        assert!(!session.is_super_admin());
        assert_eq!(session.pradeshika_sabha(), Some("Aluva"));
        assert_eq!(session.uid_or("anonymous"), "u1");
        assert_eq!(Session::anonymous().uid_or("anonymous"), "anonymous");
    }

    #[tokio::test]
    async fn register_assigns_admin_by_email() {
        let (auth, _) = service(ConnectConfig::new().with_admin_emails(["chief@spss.in"]));

        let session = auth.register("Chief@spss.in", "secret1").await.unwrap();
        assert_eq!(session.role(), Role::Admin);

        auth.logout().await.unwrap();
        let session = auth.register("member@spss.in", "secret1").await.unwrap();
        assert_eq!(session.role(), Role::User);
    }

    #[tokio::test]
    async fn login_creates_missing_profile() {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentityProvider::new());
        let account = identity.create_user("a@b.in", "secret1").await.unwrap();
        let auth = AuthService::new(store.clone(), identity, Arc::new(ConnectConfig::new()));

        let session = auth.login("a@b.in", "secret1").await.unwrap();
        assert_eq!(session.role(), Role::User);
        assert!(store.get(USERS, account.uid.as_str()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn wrong_password_surfaces_provider_message() {
        let (auth, _) = service(ConnectConfig::new());
        auth.register("a@b.in", "secret1").await.unwrap();
        auth.logout().await.unwrap();

        let err = auth.login("a@b.in", "nope-nope").await.unwrap_err();
        assert_eq!(err.user_message(), AuthErrorCode::WrongPassword.friendly_message());
        assert_eq!(auth.fetch_session().await.unwrap(), Session::anonymous());
    }

    #[tokio::test]
    async fn role_cache_serves_until_cleared() {
        let (auth, store) = service(ConnectConfig::new());
        let session = auth.register("a@b.in", "secret1").await.unwrap();
        let uid = session.user.unwrap().uid;
        assert_eq!(auth.fetch_session().await.unwrap().role(), Role::User);

        // Promote behind the cache's back
        store
            .set(USERS, uid.as_str(), serde_json::json!({ "email": "a@b.in", "role": "super_admin" }))
            .await
            .unwrap();
        assert_eq!(auth.fetch_session().await.unwrap().role(), Role::User);

        auth.clear_role_cache();
        assert_eq!(auth.fetch_session().await.unwrap().role(), Role::SuperAdmin);
    }

    #[tokio::test]
    async fn admin_create_user_requires_manage_users() {
        let (auth, _) = service(ConnectConfig::new());
        let admin = Session::signed_in(
            AuthUser { uid: UserId::from("a"), email: "a@b.in".into() },
            Some(UserProfile::new("a@b.in", Role::Admin, Utc::now())),
        );
        let err = auth
            .admin_create_user(&admin, "n@b.in", "secret1", "user", "Aluva")
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[tokio::test]
    async fn admin_create_user_checks_fields() {
        let (auth, _) = service(ConnectConfig::new());
        let root = Session::signed_in(
            AuthUser { uid: UserId::from("r"), email: "r@b.in".into() },
            Some(UserProfile::new("r@b.in", Role::SuperAdmin, Utc::now())),
        );

        let err = auth
            .admin_create_user(&root, "n@b.in", "secret1", "admin", " ")
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::MissingFields));

        let err = auth
            .admin_create_user(&root, "n@b.in", "secret1", "owner", "Aluva")
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::InvalidRole(_)));

        let profile = auth
            .admin_create_user(&root, "n@b.in", "secret1", "admin", "Aluva")
            .await
            .unwrap();
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.pradeshika_sabha.as_deref(), Some("Aluva"));
        // Creating an account leaves the actor's provider session alone
        assert_eq!(auth.fetch_session().await.unwrap(), Session::anonymous());
    }
}
