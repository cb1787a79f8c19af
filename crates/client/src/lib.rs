//! CareLink HTTP client
//!
//! [`PortalClient`] is the reqwest-backed API client; the bearer credential
//! lives on the client itself, so there is no process-global request state.
//! [`auth::AuthService`] drives the login/register/logout/refresh/initialize
//! lifecycle against a [`carelink_core::Session`].

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use auth::AuthService;
pub use client::{PortalClient, PortalClientBuilder};
pub use config::ClientConfig;
pub use error::ClientError;
