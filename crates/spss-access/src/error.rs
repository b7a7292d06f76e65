//! Access errors

use crate::page::{Action, Page};
use spss_model::Role;

/// Denied by the permission table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Role may not perform the action
    #[error("role '{role}' may not perform '{action}'")]
    Forbidden { role: Role, action: Action },

    /// Role may not open the page
    #[error("role '{role}' may not open page '{page}'")]
    PageDenied { role: Role, page: Page },
}

impl AccessError {
    /// Message shown to the person at the keyboard
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        "You do not have permission to perform this action."
    }
}
