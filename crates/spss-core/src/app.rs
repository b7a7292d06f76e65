//! Service wiring
//!
//! [`SpssConnect`] builds every service over one pair of backends and one
//! configuration, so front-ends only hold a single handle.

use crate::auth::{AuthService, Session};
use crate::config::ConnectConfig;
use crate::dashboard::Dashboard;
use crate::error::ConnectError;
use crate::form::RecordForm;
use crate::import::ImportService;
use crate::members::MemberService;
use crate::report::ReportBuilder;
use crate::users::UserService;
use crate::view::{self, RecordView};
use spss_store::{DocumentStore, IdentityProvider};
use std::sync::Arc;
use tracing::info;

/// Every service over shared backends
#[derive(Clone)]
pub struct SpssConnect {
    config: Arc<ConnectConfig>,
    auth: AuthService,
    members: MemberService,
    users: UserService,
    imports: ImportService,
    reports: ReportBuilder,
}

impl SpssConnect {
    /// Wire services over a document store and identity provider
    ///
    /// # Errors
    /// `ConnectError::Config` when the configuration is out of range
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: ConnectConfig,
    ) -> Result<Self, ConnectError> {
        config.validate()?;
        let config = Arc::new(config);

        let auth = AuthService::new(Arc::clone(&store), identity, Arc::clone(&config));
        let members = MemberService::new(Arc::clone(&store));
        let users = UserService::new(store, auth.clone());
        let imports = ImportService::new(members.clone(), config.batch_limit);
        let reports = ReportBuilder::new(&config);

        info!(page_size = config.page_size, batch_limit = config.batch_limit, "services ready");
        Ok(Self {
            config,
            auth,
            members,
            users,
            imports,
            reports,
        })
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    /// Accounts and sessions
    #[inline]
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Record CRUD
    #[inline]
    #[must_use]
    pub fn members(&self) -> &MemberService {
        &self.members
    }

    /// User management
    #[inline]
    #[must_use]
    pub fn users(&self) -> &UserService {
        &self.users
    }

    /// Bulk import
    #[inline]
    #[must_use]
    pub fn imports(&self) -> &ImportService {
        &self.imports
    }

    /// Report HTML
    #[inline]
    #[must_use]
    pub fn reports(&self) -> &ReportBuilder {
        &self.reports
    }

    /// Fresh dashboard; call [`Dashboard::load`] before rendering
    #[must_use]
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.members.clone(), Arc::clone(&self.config))
    }

    /// Blank entry form for `session`
    #[must_use]
    pub fn new_form(&self, session: &Session) -> RecordForm {
        RecordForm::for_session(session)
    }

    /// Open the record page
    ///
    /// # Errors
    /// See [`view::open`]
    pub async fn open(
        &self,
        session: &Session,
        id: Option<&str>,
        edit_param: Option<&str>,
    ) -> Result<RecordView, ConnectError> {
        view::open(&self.members, session, id, edit_param).await
    }
}

impl std::fmt::Debug for SpssConnect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpssConnect")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spss_store::{MemoryIdentityProvider, MemoryStore};

    #[test]
    fn rejects_invalid_config() {
        let result = SpssConnect::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryIdentityProvider::new()),
            ConnectConfig::new().with_page_size(0),
        );
        assert!(matches!(result, Err(ConnectError::Config(_))));
    }

    #[tokio::test]
    async fn open_without_id() {
        let app = SpssConnect::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryIdentityProvider::new()),
            ConnectConfig::default(),
        )
        .unwrap();
        let err = app.open(&Session::anonymous(), Some("  "), None).await.unwrap_err();
        assert!(matches!(err, ConnectError::NoRecordId));
        assert_eq!(err.user_message(), crate::messages::NO_RECORD_ID);
    }
}
