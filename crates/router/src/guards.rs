//! Navigation guards
//!
//! Each guard inspects the target route's metadata and the current auth
//! state and either lets the navigation proceed or names a redirect
//! target. `None` as the redirect target means the router's default
//! landing route.

use crate::route::Route;
use carelink_core::AuthState;

/// Decision produced by a single guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    /// Redirect to the named route, or the default landing route when
    /// `None`.
    Redirect(Option<String>),
}

/// Keeps authenticated users away from guest-only pages (login, register).
pub fn guest_guard(route: &Route, auth: &AuthState) -> GuardOutcome {
    if route.meta.guest_only && auth.authenticated {
        return GuardOutcome::Redirect(route.meta.authenticated_redirect.clone());
    }
    GuardOutcome::Proceed
}

/// Keeps anonymous users away from auth-only pages.
pub fn authenticated_guard(route: &Route, auth: &AuthState) -> GuardOutcome {
    if route.meta.auth_only && !auth.authenticated {
        return GuardOutcome::Redirect(None);
    }
    GuardOutcome::Proceed
}

/// Enforces `allowed_roles` membership. Routes without a role set are
/// unrestricted.
pub fn role_guard(route: &Route, auth: &AuthState) -> GuardOutcome {
    let Some(allowed_roles) = &route.meta.allowed_roles else {
        return GuardOutcome::Proceed;
    };

    if !auth.authenticated {
        return GuardOutcome::Redirect(None);
    }

    if allowed_roles.contains(&auth.role) {
        GuardOutcome::Proceed
    } else {
        GuardOutcome::Redirect(None)
    }
}
