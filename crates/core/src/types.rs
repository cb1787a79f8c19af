use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to a session with no stored profile, or a profile
/// the server returned without a role.
pub const GUEST_ROLE: &str = "guest";

/// Canonical user profile as returned by `GET /auth/me`.
///
/// The server may send additional role-specific fields (patient or
/// doctor records); only the fields the client acts on are modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl UserProfile {
    /// The profile's role, or `"guest"` when the server omitted one.
    pub fn role_or_guest(&self) -> &str {
        self.role.as_deref().unwrap_or(GUEST_ROLE)
    }
}
