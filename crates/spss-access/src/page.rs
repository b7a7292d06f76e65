//! Pages and actions

use serde::{Deserialize, Serialize};

/// A page of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Landing,
    Login,
    Create,
    Success,
    View,
    Dashboard,
    Import,
    UserManagement,
}

impl Page {
    /// Stored identifier
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Landing => "landing",
            Page::Login => "login",
            Page::Create => "create",
            Page::Success => "success",
            Page::View => "view",
            Page::Dashboard => "dashboard",
            Page::Import => "import",
            Page::UserManagement => "user_management",
        }
    }

    /// Resolve the page for a URL path
    ///
    /// Matching is by substring, most specific first, so `/user-management`
    /// never resolves to a shorter page name it contains.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        const ORDER: [(&str, Page); 7] = [
            ("user-management", Page::UserManagement),
            ("import", Page::Import),
            ("dashboard", Page::Dashboard),
            ("success", Page::Success),
            ("create", Page::Create),
            ("view", Page::View),
            ("login", Page::Login),
        ];
        ORDER
            .iter()
            .find(|(needle, _)| path.contains(needle))
            .map_or(Page::Landing, |(_, page)| *page)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    Delete,
    ExportPdf,
    Share,
    Import,
    ManageUsers,
}

impl Action {
    /// Every action
    pub const ALL: [Action; 7] = [
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::ExportPdf,
        Action::Share,
        Action::Import,
        Action::ManageUsers,
    ];

    /// Stored identifier
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::ExportPdf => "export_pdf",
            Action::Share => "share",
            Action::Import => "import",
            Action::ManageUsers => "manage_users",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_resolution() {
        assert_eq!(Page::from_path("/user-management"), Page::UserManagement);
        assert_eq!(Page::from_path("/import.html"), Page::Import);
        assert_eq!(Page::from_path("/dashboard"), Page::Dashboard);
        assert_eq!(Page::from_path("/success"), Page::Success);
        assert_eq!(Page::from_path("/create"), Page::Create);
        assert_eq!(Page::from_path("/view"), Page::View);
        assert_eq!(Page::from_path("/login"), Page::Login);
        assert_eq!(Page::from_path("/"), Page::Landing);
        assert_eq!(Page::from_path("/about"), Page::Landing);
    }

    #[test]
    fn identifiers() {
        assert_eq!(Action::ExportPdf.as_str(), "export_pdf");
        assert_eq!(Action::ManageUsers.to_string(), "manage_users");
        assert_eq!(Page::UserManagement.to_string(), "user_management");
    }
}
