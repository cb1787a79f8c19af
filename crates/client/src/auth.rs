//! Authentication service
//!
//! Drives the session lifecycle: login, register, logout, refresh and
//! initialize. Every operation catches network failures at its own boundary
//! and returns a `Result`; none panics or leaves the session half-written
//! (a stored token without a profile exists only as the deliberate
//! post-login, pre-initialize transient).
//!
//! Operations are serialized by a single-flight mutex so an overlapping
//! call cannot interleave its session writes with one already in flight.

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::types::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse};
use carelink_core::{Session, UserProfile};
use reqwest::{Method, header};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Authentication service over a [`PortalClient`] and a persisted
/// [`Session`].
pub struct AuthService {
    client: PortalClient,
    session: Session,
    op_guard: Mutex<()>,
}

impl AuthService {
    pub fn new(client: PortalClient, session: Session) -> Self {
        Self {
            client,
            session,
            op_guard: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &PortalClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchange credentials for a token and fetch the canonical profile.
    ///
    /// On any failure the attempt's partial token state is cleared before
    /// the error is returned.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<(), ClientError> {
        let _guard = self.op_guard.lock().await;
        info!(email = %credentials.email, "logging in");

        let token = self.exchange_credentials(credentials).await?;
        self.complete_sign_in(&token).await
    }

    /// Create an account, then run the same credential exchange and
    /// initialize sequence as login.
    ///
    /// A failure at the creation stage leaves no session state behind.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let _guard = self.op_guard.lock().await;
        info!(email = %request.email, role = %request.role, "registering account");

        let req = self
            .client
            .request(Method::POST, "/auth/register")
            .json(request);
        let _: serde_json::Value = self.client.execute(req).await?;

        let credentials = LoginRequest {
            email: request.email.clone(),
            password: request.password.clone(),
        };
        let token = self.exchange_credentials(&credentials).await?;
        self.complete_sign_in(&token).await
    }

    /// End the local session and best-effort notify the server.
    ///
    /// The local clear is unconditional and always wins: a failed or
    /// unreachable server never blocks logging out.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let _guard = self.op_guard.lock().await;
        self.logout_inner().await
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// With no stored refresh token this reports
    /// [`ClientError::MissingCredential`] without touching the session.
    /// A failed exchange forces a logout.
    pub async fn refresh_auth_token(&self) -> Result<(), ClientError> {
        let _guard = self.op_guard.lock().await;
        self.refresh_inner().await
    }

    /// Validate the stored session against the server.
    ///
    /// With no stored access token the session is defensively cleared.
    /// Otherwise the stored token is installed as the credential and the
    /// canonical profile fetched. On failure, one silent refresh is
    /// attempted and the fetch retried; any remaining failure forces a
    /// logout and surfaces the error.
    pub async fn initialize(&self) -> Result<(), ClientError> {
        let _guard = self.op_guard.lock().await;
        self.initialize_inner().await
    }

    async fn exchange_credentials(
        &self,
        credentials: &LoginRequest,
    ) -> Result<TokenResponse, ClientError> {
        // The token endpoint takes an OAuth2 password form, username being
        // the account email.
        let req = self.client.request(Method::POST, "/auth/token").form(&[
            ("username", credentials.email.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        self.client.execute(req).await
    }

    /// Store the token pair, install the credential and fetch the profile.
    /// Undoes its own writes when the initialize stage fails.
    async fn complete_sign_in(&self, token: &TokenResponse) -> Result<(), ClientError> {
        self.store_token_response(token)?;

        if let Err(err) = self.initialize_inner().await {
            warn!(error = %err, "sign-in could not be completed; clearing session");
            self.clear_local_session()?;
            return Err(err);
        }
        Ok(())
    }

    fn store_token_response(&self, token: &TokenResponse) -> Result<(), ClientError> {
        self.session.set_token(&token.access_token)?;
        self.session.set_token_type(&token.token_type)?;
        if let Some(refresh_token) = &token.refresh_token {
            self.session.set_refresh_token(refresh_token)?;
        }
        self.client.set_bearer_token(Some(&token.access_token));
        Ok(())
    }

    fn clear_local_session(&self) -> Result<(), ClientError> {
        self.session.clear()?;
        self.client.set_bearer_token(None);
        Ok(())
    }

    async fn logout_inner(&self) -> Result<(), ClientError> {
        // Capture the token before clearing so the server call can still
        // blacklist it.
        let token = self.session.token()?;

        self.clear_local_session()?;
        info!("local session cleared");

        if let Some(token) = token {
            let req = self
                .client
                .request(Method::POST, "/auth/logout")
                .header(header::AUTHORIZATION, format!("Bearer {token}"));
            if let Err(err) = self.client.execute::<serde_json::Value>(req).await {
                debug!(error = %err, "server logout failed; local session already cleared");
            }
        }
        Ok(())
    }

    async fn refresh_inner(&self) -> Result<(), ClientError> {
        let Some(refresh_token) = self.session.refresh_token()? else {
            warn!("token refresh requested with no stored refresh token");
            return Err(ClientError::MissingCredential(
                "no refresh token stored".into(),
            ));
        };

        let req = self
            .client
            .request(Method::POST, "/auth/refresh")
            .json(&RefreshRequest { refresh_token });

        match self.client.execute::<TokenResponse>(req).await {
            Ok(token) => {
                self.store_token_response(&token)?;
                debug!("token pair refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh rejected; forcing logout");
                self.logout_inner().await?;
                Err(err)
            }
        }
    }

    async fn initialize_inner(&self) -> Result<(), ClientError> {
        let Some(token) = self.session.token()? else {
            // No access token means no session at all; clear leftovers.
            self.clear_local_session()?;
            return Ok(());
        };

        self.client.set_bearer_token(Some(&token));

        match self.fetch_profile().await {
            Ok(profile) => {
                self.session.set_user(&profile)?;
                info!(user = %profile.email, "session initialized");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "profile fetch failed; attempting silent refresh");
                if matches!(self.refresh_inner().await, Ok(())) {
                    if let Ok(profile) = self.fetch_profile().await {
                        self.session.set_user(&profile)?;
                        return Ok(());
                    }
                }
                self.logout_inner().await?;
                Err(err)
            }
        }
    }

    async fn fetch_profile(&self) -> Result<UserProfile, ClientError> {
        let req = self.client.request(Method::GET, "/auth/me");
        self.client.execute(req).await
    }
}
