//! Route gate
//!
//! Decides, for the viewer's role and sign-in state, whether a page renders
//! or where the viewer is sent instead.

use crate::error::AccessError;
use crate::page::{Action, Page};
use crate::permissions::{can_access_page, visible_actions};
use spss_model::Role;

/// Who is looking at the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Signed in with the identity provider
    pub signed_in: bool,
    /// Resolved role (guest when signed out)
    pub role: Role,
    /// Email shown in the navigation bar
    pub email: Option<String>,
}

impl Viewer {
    /// Signed-out viewer
    #[must_use]
    pub fn guest() -> Self {
        Self {
            signed_in: false,
            role: Role::Guest,
            email: None,
        }
    }

    /// Signed-in viewer with a role
    #[must_use]
    pub fn signed_in(email: impl Into<String>, role: Role) -> Self {
        Self {
            signed_in: true,
            role,
            email: Some(email.into()),
        }
    }
}

/// Redirect targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Create,
    View,
}

impl Route {
    /// URL path
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Create => "/create",
            Route::View => "/view",
        }
    }
}

/// What a rendered page needs to know about the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub page: Page,
    pub signed_in: bool,
    pub is_admin: bool,
    pub is_super_admin: bool,
    /// Controls to show; everything else is hidden
    pub visible_actions: Vec<Action>,
}

/// Outcome of gating a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render(PageContext),
    Redirect(Route),
}

/// Gate `page` for `viewer`
#[must_use]
pub fn gate(page: Page, viewer: &Viewer) -> GateDecision {
    let context = || PageContext {
        page,
        signed_in: viewer.signed_in,
        is_admin: viewer.role.is_admin(),
        is_super_admin: viewer.role == Role::SuperAdmin,
        visible_actions: visible_actions(viewer.role),
    };

    match page {
        Page::Landing | Page::Success => GateDecision::Render(context()),
        Page::Login if viewer.signed_in => GateDecision::Redirect(Route::Dashboard),
        Page::Login => GateDecision::Render(context()),
        _ if !can_access_page(viewer.role, page) => {
            if viewer.signed_in {
                GateDecision::Redirect(Route::Dashboard)
            } else {
                GateDecision::Redirect(Route::Login)
            }
        }
        _ => GateDecision::Render(context()),
    }
}

/// Gate `page`, turning a redirect into `AccessError::PageDenied`
pub fn require_page(page: Page, viewer: &Viewer) -> Result<PageContext, AccessError> {
    match gate(page, viewer) {
        GateDecision::Render(ctx) => Ok(ctx),
        GateDecision::Redirect(_) => Err(AccessError::PageDenied {
            role: viewer.role,
            page,
        }),
    }
}

/// How the view page presents a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Read-only detail view
    ReadOnly,
    /// Edit form opened by an admin (`edit=1`)
    AdminEdit,
    /// Edit form opened from a share link (`edit=share`), open to anyone
    SharedEdit,
}

impl ViewMode {
    /// Resolve from the `edit` query parameter
    #[must_use]
    pub fn resolve(edit_param: Option<&str>, is_admin: bool) -> Self {
        match edit_param.map(str::trim) {
            Some("share") => ViewMode::SharedEdit,
            Some("1") if is_admin => ViewMode::AdminEdit,
            _ => ViewMode::ReadOnly,
        }
    }

    /// Whether the edit form is shown
    #[must_use]
    pub fn is_edit(&self) -> bool {
        !matches!(self, ViewMode::ReadOnly)
    }
}

/// Shareable edit link for a record
#[must_use]
pub fn share_url(base: &str, record_id: &str) -> String {
    format!("{}/view?id={record_id}&edit=share", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_and_success_always_render() {
        for page in [Page::Landing, Page::Success] {
            assert!(matches!(gate(page, &Viewer::guest()), GateDecision::Render(_)));
            let user = Viewer::signed_in("u@x.in", Role::User);
            assert!(matches!(gate(page, &user), GateDecision::Render(_)));
        }
    }

    #[test]
    fn signed_in_viewers_skip_login() {
        let admin = Viewer::signed_in("a@x.in", Role::Admin);
        assert_eq!(gate(Page::Login, &admin), GateDecision::Redirect(Route::Dashboard));
        assert!(matches!(gate(Page::Login, &Viewer::guest()), GateDecision::Render(_)));
    }

    #[test]
    fn denied_pages_redirect_by_sign_in_state() {
        assert_eq!(
            gate(Page::Dashboard, &Viewer::guest()),
            GateDecision::Redirect(Route::Login)
        );
        let user = Viewer::signed_in("u@x.in", Role::User);
        assert_eq!(gate(Page::Import, &user), GateDecision::Redirect(Route::Dashboard));
    }

    #[test]
    fn render_context_flags() {
        let sa = Viewer::signed_in("s@x.in", Role::SuperAdmin);
        let GateDecision::Render(ctx) = gate(Page::Import, &sa) else {
            panic!("super admin should reach import");
        };
        assert!(ctx.is_admin && ctx.is_super_admin && ctx.signed_in);
        assert!(ctx.visible_actions.contains(&Action::ManageUsers));
    }

    #[test]
    fn require_page_maps_redirect_to_error() {
        let err = require_page(Page::UserManagement, &Viewer::signed_in("a@x.in", Role::Admin))
            .unwrap_err();
        assert!(matches!(err, AccessError::PageDenied { role: Role::Admin, .. }));
    }

    #[test]
    fn view_modes() {
        assert_eq!(ViewMode::resolve(Some("share"), false), ViewMode::SharedEdit);
        assert_eq!(ViewMode::resolve(Some("1"), true), ViewMode::AdminEdit);
        assert_eq!(ViewMode::resolve(Some("1"), false), ViewMode::ReadOnly);
        assert_eq!(ViewMode::resolve(None, true), ViewMode::ReadOnly);
        assert!(!ViewMode::ReadOnly.is_edit());
    }

    #[test]
    fn share_links() {
        assert_eq!(
            share_url("https://spss.example/", "01ABC"),
            "https://spss.example/view?id=01ABC&edit=share"
        );
    }
}
