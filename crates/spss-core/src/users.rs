//! User management for super admins

use crate::auth::{AuthService, Session};
use crate::error::ConnectError;
use spss_access::Action;
use spss_model::format::{format_timestamp, or_dash};
use spss_model::{Role, UserId, UserProfile, USERS};
use spss_store::DocumentStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Badge class for a role
#[must_use]
pub fn role_badge_class(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "bg-danger",
        Role::Admin => "bg-warning text-dark",
        Role::User | Role::Guest => "bg-secondary",
    }
}

/// One row of the user table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    /// 1-based
    pub index: usize,
    pub email: String,
    pub role: Role,
    pub badge_class: &'static str,
    pub sabha: String,
    pub created: String,
}

/// Lists and creates accounts
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    auth: AuthService,
}

impl UserService {
    /// Create service
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, auth: AuthService) -> Self {
        Self { store, auth }
    }

    /// Every profile, newest first
    ///
    /// # Errors
    /// - `ConnectError::Access` unless the actor may manage users
    /// - `ConnectError::Store` on backend failure
    pub async fn list_users(&self, actor: &Session) -> Result<Vec<UserRow>, ConnectError> {
        actor.require(Action::ManageUsers)?;

        let mut profiles: Vec<UserProfile> = self
            .store
            .list(USERS)
            .await?
            .into_iter()
            .filter_map(|doc| {
                doc.decode::<UserProfile>()
                    .map(|p| p.with_uid(UserId::from(doc.id.as_str())))
                    .map_err(|e| warn!(uid = %doc.id, error = %e, "skipping undecodable profile"))
                    .ok()
            })
            .collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = profiles.len(), "users listed");

        Ok(profiles
            .iter()
            .enumerate()
            .map(|(i, p)| UserRow {
                index: i + 1,
                email: or_dash(&p.email).to_string(),
                role: p.role,
                badge_class: role_badge_class(p.role),
                sabha: or_dash(p.pradeshika_sabha.as_deref().unwrap_or_default()).to_string(),
                created: format_timestamp(p.created_at.as_ref()),
            })
            .collect())
    }

    /// Create an account with a role and sabha, returning the toast text
    ///
    /// # Errors
    /// See [`AuthService::admin_create_user`]
    pub async fn create_user(
        &self,
        actor: &Session,
        email: &str,
        password: &str,
        role: &str,
        sabha: &str,
    ) -> Result<String, ConnectError> {
        let profile = self.auth.admin_create_user(actor, email, password, role, sabha).await?;
        let sabha = profile.pradeshika_sabha.as_deref().unwrap_or_default();
        Ok(format!("User created: {} ({} — {sabha})", profile.email, profile.role))
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}
