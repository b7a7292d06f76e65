//! Role → pages/actions table

use crate::error::AccessError;
use crate::page::{Action, Page};
use spss_model::Role;

/// What a role may open and do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePermissions {
    /// Pages the role may open
    pub pages: &'static [Page],
    /// Actions the role may perform
    pub actions: &'static [Action],
}

const SUPER_ADMIN: RolePermissions = RolePermissions {
    pages: &[
        Page::Landing,
        Page::Login,
        Page::Create,
        Page::Success,
        Page::View,
        Page::Dashboard,
        Page::Import,
        Page::UserManagement,
    ],
    actions: &[
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::ExportPdf,
        Action::Share,
        Action::Import,
        Action::ManageUsers,
    ],
};

const ADMIN: RolePermissions = RolePermissions {
    pages: &[
        Page::Landing,
        Page::Login,
        Page::Create,
        Page::Success,
        Page::View,
        Page::Dashboard,
    ],
    actions: &[
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::ExportPdf,
        Action::Share,
    ],
};

const USER: RolePermissions = RolePermissions {
    pages: &[Page::Landing, Page::Login, Page::View, Page::Dashboard],
    actions: &[Action::ExportPdf, Action::Share],
};

const GUEST: RolePermissions = RolePermissions {
    pages: &[Page::Landing, Page::Create, Page::Success, Page::View],
    actions: &[Action::Create, Action::ExportPdf],
};

/// Permission set of a role
#[inline]
#[must_use]
pub fn permissions(role: Role) -> &'static RolePermissions {
    match role {
        Role::SuperAdmin => &SUPER_ADMIN,
        Role::Admin => &ADMIN,
        Role::User => &USER,
        Role::Guest => &GUEST,
    }
}

/// Whether `role` may open `page`
#[inline]
#[must_use]
pub fn can_access_page(role: Role, page: Page) -> bool {
    permissions(role).pages.contains(&page)
}

/// Whether `role` may perform `action`
#[inline]
#[must_use]
pub fn can_perform_action(role: Role, action: Action) -> bool {
    permissions(role).actions.contains(&action)
}

/// Actions whose controls should be shown to `role`, in table order
#[must_use]
pub fn visible_actions(role: Role) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|a| can_perform_action(role, *a))
        .collect()
}

/// Fail with `AccessError::Forbidden` unless `role` may perform `action`
pub fn ensure_action(role: Role, action: Action) -> Result<(), AccessError> {
    if can_perform_action(role, action) {
        Ok(())
    } else {
        Err(AccessError::Forbidden { role, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_has_everything() {
        for action in Action::ALL {
            assert!(can_perform_action(Role::SuperAdmin, action));
        }
        assert!(can_access_page(Role::SuperAdmin, Page::UserManagement));
    }

    #[test]
    fn admin_cannot_import_or_manage_users() {
        assert!(!can_perform_action(Role::Admin, Action::Import));
        assert!(!can_perform_action(Role::Admin, Action::ManageUsers));
        assert!(!can_access_page(Role::Admin, Page::Import));
        assert!(can_perform_action(Role::Admin, Action::Delete));
    }

    #[test]
    fn user_is_read_mostly() {
        assert_eq!(visible_actions(Role::User), vec![Action::ExportPdf, Action::Share]);
        assert!(!can_access_page(Role::User, Page::Create));
        assert!(can_access_page(Role::User, Page::Dashboard));
    }

    #[test]
    fn guest_can_submit_but_not_browse() {
        assert!(can_perform_action(Role::Guest, Action::Create));
        assert!(!can_access_page(Role::Guest, Page::Dashboard));
        assert!(!can_access_page(Role::Guest, Page::Login));
        assert!(can_access_page(Role::Guest, Page::Success));
    }

    #[test]
    fn ensure_action_reports_role_and_action() {
        let err = ensure_action(Role::User, Action::Delete).unwrap_err();
        assert_eq!(
            err,
            AccessError::Forbidden {
                role: Role::User,
                action: Action::Delete
            }
        );
        assert!(ensure_action(Role::Admin, Action::Delete).is_ok());
    }

    #[test]
    fn privileges_grow_with_role() {
        // Every action a less privileged signed-in role has, the next one has too.
        for pair in [Role::User, Role::Admin, Role::SuperAdmin].windows(2) {
            for action in visible_actions(pair[0]) {
                assert!(can_perform_action(pair[1], action), "{} lost {action}", pair[1]);
            }
        }
    }
}
