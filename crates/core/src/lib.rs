//! CareLink core types and session storage

pub mod error;
pub mod session;
pub mod state_dir;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use session::{AuthState, FileStore, MemoryStore, Session, SessionStore};
pub use state_dir::StateDir;
pub use types::UserProfile;
