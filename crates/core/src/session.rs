//! Persisted session storage and the auth state derived from it
//!
//! Session fields are individually keyed serialized values. A field that is
//! absent means logged out. Writes must be visible to the next read, so both
//! stores keep an in-process map behind a lock; the file store additionally
//! persists the map on every write so sessions survive process restarts.

use crate::error::{CoreError, CoreResult};
use crate::types::{GUEST_ROLE, UserProfile};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Storage keys for the persisted session fields.
pub mod keys {
    pub const USER: &str = "user";
    pub const TOKEN: &str = "token";
    pub const TOKEN_TYPE: &str = "tokenType";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    /// Consumed by the i18n layer; the store only carries it.
    pub const PREFERRED_LANGUAGE: &str = "preferred-language";
}

/// Durable key-value storage for session fields.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store persisting the session as a JSON map.
///
/// Every write rewrites the file, which is small (a handful of keys), so
/// the simplicity wins over incremental updates.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading any previously persisted session.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            HashMap::new()
        };
        debug!(path = %path.display(), "opened session store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> CoreResult<()> {
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        entries.remove(key);
        self.persist(&entries)
    }
}

/// Derived authentication flags, snapshotted from a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    pub role: String,
}

impl AuthState {
    /// State of a session with no stored profile.
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            role: GUEST_ROLE.to_string(),
        }
    }

    /// State of a logged-in session with the given role.
    pub fn authenticated(role: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            role: role.into(),
        }
    }
}

/// Typed view over a [`SessionStore`].
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn user(&self) -> CoreResult<Option<UserProfile>> {
        match self.store.get(keys::USER)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_user(&self, user: &UserProfile) -> CoreResult<()> {
        let raw = serde_json::to_string(user)?;
        self.store.set(keys::USER, &raw)
    }

    pub fn token(&self) -> CoreResult<Option<String>> {
        self.store.get(keys::TOKEN)
    }

    pub fn set_token(&self, token: &str) -> CoreResult<()> {
        self.store.set(keys::TOKEN, token)
    }

    pub fn token_type(&self) -> CoreResult<Option<String>> {
        self.store.get(keys::TOKEN_TYPE)
    }

    pub fn set_token_type(&self, token_type: &str) -> CoreResult<()> {
        self.store.set(keys::TOKEN_TYPE, token_type)
    }

    pub fn refresh_token(&self) -> CoreResult<Option<String>> {
        self.store.get(keys::REFRESH_TOKEN)
    }

    pub fn set_refresh_token(&self, refresh_token: &str) -> CoreResult<()> {
        self.store.set(keys::REFRESH_TOKEN, refresh_token)
    }

    pub fn preferred_language(&self) -> CoreResult<Option<String>> {
        self.store.get(keys::PREFERRED_LANGUAGE)
    }

    pub fn set_preferred_language(&self, language: &str) -> CoreResult<()> {
        self.store.set(keys::PREFERRED_LANGUAGE, language)
    }

    /// Remove every auth-related field in one call.
    ///
    /// The preferred language is deliberately left alone; it belongs to
    /// the user's device, not their login.
    pub fn clear(&self) -> CoreResult<()> {
        self.store.remove(keys::USER)?;
        self.store.remove(keys::TOKEN)?;
        self.store.remove(keys::TOKEN_TYPE)?;
        self.store.remove(keys::REFRESH_TOKEN)?;
        Ok(())
    }

    /// Snapshot the derived auth state.
    ///
    /// Authenticated iff a user profile is stored; the role falls back to
    /// `"guest"` when the profile or its role is absent.
    pub fn auth_state(&self) -> CoreResult<AuthState> {
        match self.user()? {
            Some(user) => Ok(AuthState::authenticated(user.role_or_guest())),
            None => Ok(AuthState::anonymous()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Arc::new(MemoryStore::new()))
    }

    fn profile(role: Option<&str>) -> UserProfile {
        UserProfile {
            id: 7,
            email: "pat@example.com".to_string(),
            first_name: "Pat".to_string(),
            last_name: "Doe".to_string(),
            role: role.map(str::to_string),
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.get(keys::TOKEN).unwrap(), None);
        store.set(keys::TOKEN, "abc").unwrap();
        assert_eq!(store.get(keys::TOKEN).unwrap(), Some("abc".to_string()));
        store.remove(keys::TOKEN).unwrap();
        assert_eq!(store.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set(keys::TOKEN, "persisted").unwrap();
        store.set(keys::TOKEN_TYPE, "bearer").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(keys::TOKEN).unwrap(),
            Some("persisted".to_string())
        );
        assert_eq!(
            reopened.get(keys::TOKEN_TYPE).unwrap(),
            Some("bearer".to_string())
        );
    }

    #[test]
    fn file_store_remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set(keys::REFRESH_TOKEN, "r1").unwrap();
        store.remove(keys::REFRESH_TOKEN).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::REFRESH_TOKEN).unwrap(), None);
    }

    #[test]
    fn auth_state_is_anonymous_without_user() {
        let session = session();
        assert_eq!(session.auth_state().unwrap(), AuthState::anonymous());
    }

    #[test]
    fn auth_state_reflects_stored_profile() {
        let session = session();
        session.set_user(&profile(Some("doctor"))).unwrap();
        let state = session.auth_state().unwrap();
        assert!(state.authenticated);
        assert_eq!(state.role, "doctor");
    }

    #[test]
    fn missing_role_defaults_to_guest() {
        let session = session();
        session.set_user(&profile(None)).unwrap();
        let state = session.auth_state().unwrap();
        assert!(state.authenticated);
        assert_eq!(state.role, GUEST_ROLE);
    }

    #[test]
    fn clear_removes_auth_fields_but_keeps_language() {
        let session = session();
        session.set_user(&profile(Some("patient"))).unwrap();
        session.set_token("t").unwrap();
        session.set_token_type("bearer").unwrap();
        session.set_refresh_token("r").unwrap();
        session.set_preferred_language("ro").unwrap();

        session.clear().unwrap();

        assert_eq!(session.user().unwrap(), None);
        assert_eq!(session.token().unwrap(), None);
        assert_eq!(session.token_type().unwrap(), None);
        assert_eq!(session.refresh_token().unwrap(), None);
        assert_eq!(
            session.preferred_language().unwrap(),
            Some("ro".to_string())
        );
        assert_eq!(session.auth_state().unwrap(), AuthState::anonymous());
    }

    #[test]
    fn mock_store_can_back_a_session() {
        use mockall::predicate::eq;

        let mut store = mock::MockSessionStore::new();
        store
            .expect_get()
            .with(eq(keys::USER))
            .returning(|_| Ok(None));

        let session = Session::new(Arc::new(store));
        assert_eq!(session.auth_state().unwrap(), AuthState::anonymous());
    }
}
