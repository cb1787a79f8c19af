//! Route definitions and the navigation guard pipeline
//!
//! Guards are pure functions over a route's access-control metadata and a
//! snapshot of the auth state, so navigation policy unit-tests without any
//! UI runtime. The pipeline runs them in a fixed order and the first
//! redirect wins.

pub mod guards;
pub mod route;
pub mod router;

pub use guards::{GuardOutcome, authenticated_guard, guest_guard, role_guard};
pub use route::{Route, RouteMeta};
pub use router::{Resolution, Router};
