//! SPSS Connect access control
//!
//! Role-based gating is a static table: each role lists the pages it may open
//! and the actions it may perform. Everything here is pure; the services call
//! [`ensure_action`] before touching the backend and the front-ends call
//! [`gate`] before rendering a page.
//!
//! # Example
//!
//! ```rust
//! use spss_access::{can_perform_action, gate, Action, GateDecision, Page, Route, Viewer};
//! use spss_model::Role;
//!
//! assert!(can_perform_action(Role::SuperAdmin, Action::Import));
//! assert!(!can_perform_action(Role::Admin, Action::Import));
//!
//! let decision = gate(Page::Dashboard, &Viewer::guest());
//! assert_eq!(decision, GateDecision::Redirect(Route::Login));
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod gate;
pub mod page;
pub mod permissions;

pub use error::AccessError;
pub use gate::{
    gate, require_page, share_url, GateDecision, PageContext, Route, ViewMode, Viewer,
};
pub use page::{Action, Page};
pub use permissions::{
    can_access_page, can_perform_action, ensure_action, permissions, visible_actions,
    RolePermissions,
};
