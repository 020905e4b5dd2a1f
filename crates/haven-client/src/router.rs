//! Role-based view routing
//!
//! One pure function decides, for every navigation, whether the current
//! identity may see a view: no identity goes to login, a role mismatch
//! goes to the user's own dashboard, anything else renders. Every
//! role-gated view consults this single function; there are no per-view
//! role checks.

use haven_core::{Role, SafeIdentity};

/// Where a navigation should land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// No identity: show the login view
    Login,
    /// Wrong role for the requested view: show this role's dashboard
    Dashboard(Role),
    /// Render the requested view
    Allow,
}

/// Decide the route for an identity against a view's required role
///
/// Stateless and I/O-free; re-evaluated on every navigation.
pub fn route(identity: Option<&SafeIdentity>, required: Option<Role>) -> RouteTarget {
    let Some(identity) = identity else {
        return RouteTarget::Login;
    };

    match required {
        Some(required) if required != identity.role => RouteTarget::Dashboard(identity.role),
        _ => RouteTarget::Allow,
    }
}

/// Dashboard path for a role
///
/// The enumeration is closed, so every role has a dashboard; there is no
/// unrecognized-role fallback to need.
pub fn dashboard_path(role: Role) -> &'static str {
    match role {
        Role::Victim => "/victim",
        Role::Counsellor => "/counsellor",
        Role::Legal => "/legal",
        Role::Admin => "/admin",
    }
}
