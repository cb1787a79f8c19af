//! Route definitions with access-control metadata

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Static access-control configuration attached to a route.
///
/// Immutable once the router is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Only reachable while logged in.
    #[serde(default)]
    pub auth_only: bool,
    /// Only reachable while logged out (login and register pages).
    #[serde(default)]
    pub guest_only: bool,
    /// When set, the session's role must be a member.
    #[serde(default)]
    pub allowed_roles: Option<HashSet<String>>,
    /// Where the guest guard sends an already-authenticated visitor.
    #[serde(default)]
    pub authenticated_redirect: Option<String>,
}

impl RouteMeta {
    pub fn guest_only() -> Self {
        Self {
            guest_only: true,
            ..Self::default()
        }
    }

    pub fn auth_only() -> Self {
        Self {
            auth_only: true,
            ..Self::default()
        }
    }

    pub fn with_allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_authenticated_redirect(mut self, target: impl Into<String>) -> Self {
        self.authenticated_redirect = Some(target.into());
        self
    }
}

/// A named route in the portal's navigation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub meta: RouteMeta,
}

impl Route {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            meta: RouteMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_defaults_are_unrestricted() {
        let meta = RouteMeta::default();
        assert!(!meta.auth_only);
        assert!(!meta.guest_only);
        assert!(meta.allowed_roles.is_none());
        assert!(meta.authenticated_redirect.is_none());
    }

    #[test]
    fn meta_deserializes_with_partial_fields() {
        let meta: RouteMeta = serde_json::from_str(r#"{"guest_only": true}"#).unwrap();
        assert!(meta.guest_only);
        assert!(!meta.auth_only);
    }

    #[test]
    fn builder_collects_roles_into_a_set() {
        let meta = RouteMeta::auth_only().with_allowed_roles(["patient", "patient", "doctor"]);
        let roles = meta.allowed_roles.unwrap();
        assert_eq!(roles.len(), 2);
        assert!(roles.contains("patient"));
        assert!(roles.contains("doctor"));
    }
}
