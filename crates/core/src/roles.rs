//! Role names and the central capability check.
//!
//! Global roles live on the `users` row; workgroup roles live on
//! `workgroup_members`. Both sets must match the `CHECK` constraints in
//! `20260301000001_create_users_and_workgroups.sql`.
//!
//! Every handler decides access through [`authorize`], which returns a tagged
//! [`Access`] value instead of a bare boolean so the API layer can tell
//! "not logged in" apart from "logged in but not allowed".

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Role constants
-------------------------------------------------------------------------- */

/// Regular member of the organization.
pub const ROLE_USER: &str = "USER";

/// Organization administrator.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Administrator who may also grant and revoke administrator rights.
pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";

/// All valid global role values.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN, ROLE_SUPER_ADMIN];

/// Plain workgroup member.
pub const MEMBER_ROLE_MEMBER: &str = "MEMBER";

/// Workgroup administrator.
pub const MEMBER_ROLE_ADMIN: &str = "ADMIN";

/// Workgroup super administrator.
pub const MEMBER_ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";

/// All valid workgroup membership role values.
pub const VALID_MEMBER_ROLES: &[&str] =
    &[MEMBER_ROLE_MEMBER, MEMBER_ROLE_ADMIN, MEMBER_ROLE_SUPER_ADMIN];

/// Validate that a global role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Validate that a workgroup membership role string is one of the accepted values.
pub fn validate_member_role(role: &str) -> Result<(), CoreError> {
    if VALID_MEMBER_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid workgroup role '{role}'. Must be one of: {}",
            VALID_MEMBER_ROLES.join(", ")
        )))
    }
}

/// `ADMIN` and `SUPER_ADMIN` both count as administrative, globally and
/// inside a workgroup.
pub fn is_admin_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_SUPER_ADMIN
}

/* --------------------------------------------------------------------------
Capability check
-------------------------------------------------------------------------- */

/// Something a caller may want to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read data, create reports, vote, comment.
    Participate,
    /// Open/close rounds, resolve objections, resolve consensus on a report.
    ManageConsensus,
    /// Add, update, and remove workgroup members.
    ManageWorkgroup,
    /// List, provision, deactivate users and change their global role.
    AdministerUsers,
    /// Grant or revoke the `SUPER_ADMIN` global role.
    AssignSuperAdmin,
    /// Delete other users' comments. Global admins only.
    ModerateComments,
}

/// The caller as seen by [`authorize`].
///
/// `workgroup_role` is the caller's membership role in the workgroup that
/// owns the target resource, if the resource belongs to one and the caller
/// is a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor<'a> {
    pub role: &'a str,
    pub is_active: bool,
    pub workgroup_role: Option<&'a str>,
}

impl<'a> Actor<'a> {
    /// An active actor with only a global role.
    pub fn global(role: &'a str) -> Self {
        Self {
            role,
            is_active: true,
            workgroup_role: None,
        }
    }

    /// Attach the caller's membership role in the target workgroup.
    pub fn in_workgroup(mut self, workgroup_role: Option<&'a str>) -> Self {
        self.workgroup_role = workgroup_role;
        self
    }
}

/// Outcome of a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authorized,
    Forbidden,
    Unauthenticated,
}

impl Access {
    /// Convert into a `Result`, using `action` to build the error message.
    pub fn require(self, action: &str) -> Result<(), CoreError> {
        match self {
            Access::Authorized => Ok(()),
            Access::Forbidden => Err(CoreError::Forbidden(format!(
                "Insufficient permissions to {action}"
            ))),
            Access::Unauthenticated => Err(CoreError::Unauthorized(
                "Authentication required".to_string(),
            )),
        }
    }
}

/// Decide whether `actor` holds `capability`.
///
/// `None` means the request carried no valid session.
pub fn authorize(actor: Option<&Actor<'_>>, capability: Capability) -> Access {
    let Some(actor) = actor else {
        return Access::Unauthenticated;
    };
    if !actor.is_active {
        return Access::Forbidden;
    }

    let global_admin = is_admin_role(actor.role);
    let workgroup_admin = actor.workgroup_role.is_some_and(is_admin_role);

    let allowed = match capability {
        Capability::Participate => true,
        Capability::ManageConsensus | Capability::ManageWorkgroup => {
            global_admin || workgroup_admin
        }
        Capability::AdministerUsers | Capability::ModerateComments => global_admin,
        Capability::AssignSuperAdmin => actor.role == ROLE_SUPER_ADMIN,
    };

    if allowed {
        Access::Authorized
    } else {
        Access::Forbidden
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn no_session_is_unauthenticated() {
        assert_eq!(
            authorize(None, Capability::Participate),
            Access::Unauthenticated
        );
    }

    #[test]
    fn any_active_user_participates() {
        let actor = Actor::global(ROLE_USER);
        assert_eq!(
            authorize(Some(&actor), Capability::Participate),
            Access::Authorized
        );
    }

    #[test]
    fn inactive_user_is_forbidden_everything() {
        let actor = Actor {
            role: ROLE_SUPER_ADMIN,
            is_active: false,
            workgroup_role: None,
        };
        assert_eq!(
            authorize(Some(&actor), Capability::Participate),
            Access::Forbidden
        );
    }

    #[test]
    fn plain_user_cannot_manage_consensus() {
        let actor = Actor::global(ROLE_USER);
        assert_eq!(
            authorize(Some(&actor), Capability::ManageConsensus),
            Access::Forbidden
        );
    }

    #[test]
    fn global_admins_manage_consensus() {
        for role in [ROLE_ADMIN, ROLE_SUPER_ADMIN] {
            let actor = Actor::global(role);
            assert_eq!(
                authorize(Some(&actor), Capability::ManageConsensus),
                Access::Authorized
            );
        }
    }

    #[test]
    fn workgroup_admin_manages_consensus_in_its_workgroup() {
        let actor = Actor::global(ROLE_USER).in_workgroup(Some(MEMBER_ROLE_ADMIN));
        assert_eq!(
            authorize(Some(&actor), Capability::ManageConsensus),
            Access::Authorized
        );
        assert_eq!(
            authorize(Some(&actor), Capability::ManageWorkgroup),
            Access::Authorized
        );
    }

    #[test]
    fn workgroup_member_cannot_manage() {
        let actor = Actor::global(ROLE_USER).in_workgroup(Some(MEMBER_ROLE_MEMBER));
        assert_eq!(
            authorize(Some(&actor), Capability::ManageWorkgroup),
            Access::Forbidden
        );
    }

    #[test]
    fn workgroup_admin_cannot_administer_users() {
        let actor = Actor::global(ROLE_USER).in_workgroup(Some(MEMBER_ROLE_SUPER_ADMIN));
        assert_eq!(
            authorize(Some(&actor), Capability::AdministerUsers),
            Access::Forbidden
        );
    }

    #[test]
    fn only_global_admins_moderate_comments() {
        let workgroup_admin = Actor::global(ROLE_USER).in_workgroup(Some(MEMBER_ROLE_ADMIN));
        assert_eq!(
            authorize(Some(&workgroup_admin), Capability::ModerateComments),
            Access::Forbidden
        );
        assert_eq!(
            authorize(Some(&Actor::global(ROLE_ADMIN)), Capability::ModerateComments),
            Access::Authorized
        );
    }

    #[test]
    fn only_super_admin_assigns_super_admin() {
        let admin = Actor::global(ROLE_ADMIN);
        let super_admin = Actor::global(ROLE_SUPER_ADMIN);
        assert_eq!(
            authorize(Some(&admin), Capability::AssignSuperAdmin),
            Access::Forbidden
        );
        assert_eq!(
            authorize(Some(&super_admin), Capability::AssignSuperAdmin),
            Access::Authorized
        );
    }

    #[test]
    fn require_maps_to_core_errors() {
        assert!(Access::Authorized.require("do it").is_ok());
        assert_matches!(
            Access::Forbidden.require("open a round"),
            Err(CoreError::Forbidden(msg)) if msg.contains("open a round")
        );
        assert_matches!(
            Access::Unauthenticated.require("open a round"),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn role_validation() {
        assert!(validate_role(ROLE_USER).is_ok());
        assert!(validate_role("admin").is_err());
        assert!(validate_member_role(MEMBER_ROLE_MEMBER).is_ok());
        assert!(validate_member_role("OWNER").is_err());
    }
}
