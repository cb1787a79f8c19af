//! Route table and the ordered guard pipeline

use crate::guards::{GuardOutcome, authenticated_guard, guest_guard, role_guard};
use crate::route::{Route, RouteMeta};
use carelink_core::AuthState;
use tracing::debug;

/// Result of resolving a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// All guards passed; commit the navigation.
    Proceed,
    /// A guard fired; navigate to `to` instead.
    Redirect { to: String },
    /// No route matches the requested name or path.
    NotFound,
}

/// Owns the route table and runs the guard pipeline per navigation.
pub struct Router {
    routes: Vec<Route>,
    default_route: String,
}

impl Router {
    /// Build a router over `routes`. `default_route` names the landing
    /// route guards redirect to.
    pub fn new(routes: Vec<Route>, default_route: impl Into<String>) -> Self {
        Self {
            routes,
            default_route: default_route.into(),
        }
    }

    /// The portal's navigation table with its default landing route.
    pub fn portal() -> Self {
        let routes = vec![
            Route::new("/", "home"),
            Route::new("/appointments", "appointments")
                .with_meta(RouteMeta::auth_only().with_allowed_roles(["patient", "doctor"])),
            Route::new("/chat", "chat").with_meta(RouteMeta::auth_only()),
            Route::new("/documentation", "documentation"),
            Route::new("/login", "login").with_meta(RouteMeta::guest_only()),
            Route::new("/register", "register").with_meta(RouteMeta::guest_only()),
        ];
        Self::new(routes, "home")
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn default_route(&self) -> &str {
        &self.default_route
    }

    /// Look up a route by name or path.
    pub fn find(&self, target: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.name == target || r.path == target)
    }

    /// Run the guard pipeline for a navigation to `target`.
    ///
    /// Guards run in a fixed order: guest, authenticated, role. The first
    /// redirect short-circuits and wins; later guards do not run.
    pub fn resolve(&self, target: &str, auth: &AuthState) -> Resolution {
        let Some(route) = self.find(target) else {
            return Resolution::NotFound;
        };

        for guard in [guest_guard, authenticated_guard, role_guard] {
            if let GuardOutcome::Redirect(to) = guard(route, auth) {
                let to = to.unwrap_or_else(|| self.default_route.clone());
                debug!(
                    route = %route.name,
                    redirect = %to,
                    authenticated = auth.authenticated,
                    role = %auth.role,
                    "navigation redirected"
                );
                return Resolution::Redirect { to };
            }
        }

        Resolution::Proceed
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::portal()
    }
}
