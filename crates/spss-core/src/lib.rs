//! SPSS Connect services
//!
//! Everything between a front-end and the backend boundary:
//! - Sessions, registration and the cached role lookup
//! - Household record CRUD, the entry form and its validation
//! - The dashboard pipeline (search, sort, paginate)
//! - Printable reports, bulk JSON import and user management
//!
//! # Example
//!
//! ```rust,ignore
//! use spss_core::prelude::*;
//! use spss_store::{MemoryIdentityProvider, MemoryStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), ConnectError> {
//! let app = SpssConnect::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryIdentityProvider::new()),
//!     ConnectConfig::new().with_admin_emails(["secretary@spss.in"]),
//! )?;
//!
//! let session = app.auth().register("secretary@spss.in", "secret1").await?;
//! let mut dashboard = app.dashboard();
//! dashboard.load(&session).await?;
//! println!("{}", dashboard.render("").record_count);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod app;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod import;
pub mod members;
pub mod messages;
pub mod pagination;
pub mod report;
pub mod search;
pub mod sort;
pub mod users;
pub mod validation;
pub mod view;

pub use app::SpssConnect;
pub use auth::{AuthService, Session};
pub use config::ConnectConfig;
pub use dashboard::{Dashboard, DashboardRow, DashboardView, PageLink};
pub use error::{ConfigError, ConnectError, ImportError, ReportError};
pub use form::{RecordForm, SubmitOutcome};
pub use import::{ImportInput, ImportReport, ImportService, SkippedRecord};
pub use members::MemberService;
pub use pagination::Paginator;
pub use report::{export, HtmlFileRenderer, Report, ReportBuilder, ReportRenderer};
pub use search::search;
pub use sort::{sort, SortDirection};
pub use users::{UserRow, UserService};
pub use validation::{validate_form, ValidationReport};
pub use view::{DetailField, DetailSection, RecordView};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for front-ends
    pub use crate::{
        ConnectConfig, ConnectError, Dashboard, ImportInput, RecordForm, ReportRenderer, Session,
        SortDirection, SpssConnect, SubmitOutcome,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
