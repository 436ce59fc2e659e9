//! Login, logout and startup restore

use super::state::{AuthAction, AuthHandle, AuthState};
use subsmania_http::types::{AccountDeletionRequest, LoginRequest, UserProfile};
use subsmania_http::{ClientError, SubsClient};

/// Drives the auth state from client calls
#[derive(Debug, Clone)]
pub struct AuthService {
    client: SubsClient,
    auth: AuthHandle,
}

impl AuthService {
    /// `auth` should be the handle whose session-end hook `client` was built with
    pub fn new(client: SubsClient, auth: AuthHandle) -> Self {
        Self { client, auth }
    }

    pub fn client(&self) -> &SubsClient {
        &self.client
    }

    pub fn auth(&self) -> &AuthHandle {
        &self.auth
    }

    pub fn state(&self) -> AuthState {
        self.auth.snapshot()
    }

    /// Re-establish a stored session at startup.
    ///
    /// Without a refresh token the user is simply logged out. Otherwise the
    /// cached profile is shown right away while the access token is renewed;
    /// if renewal fails every stored credential is dropped.
    pub async fn restore(&self) -> AuthState {
        let credentials = self.client.credentials();
        if !credentials.has_session() {
            self.auth.dispatch(AuthAction::Restored(None));
            return self.auth.dispatch(AuthAction::SetLoading(false));
        }

        let cached = credentials.user_profile::<UserProfile>();
        self.auth.dispatch(AuthAction::Restored(cached.clone()));

        match self.client.renew_access_token().await {
            Ok(_) => {
                if cached.is_none() {
                    self.load_profile().await;
                }
                self.auth.dispatch(AuthAction::SetLoading(false))
            }
            Err(e) => {
                warn!("Could not restore session: {e}");
                if let Err(e) = credentials.clear() {
                    warn!("Failed to clear stored credentials: {e}");
                }
                self.auth.dispatch(AuthAction::LoggedOut)
            }
        }
    }

    /// Log in, then fetch and cache the member's profile.
    ///
    /// If the profile cannot be fetched the issued tokens are dropped again,
    /// so a failed login never leaves a session behind.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthState, ClientError> {
        self.client.login(request).await?;
        let profile = match self.client.my_page().await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Login succeeded but profile fetch failed: {e}");
                if let Err(e) = self.client.credentials().clear() {
                    warn!("Failed to clear stored credentials: {e}");
                }
                self.auth.dispatch(AuthAction::LoggedOut);
                return Err(e);
            }
        };
        if let Err(e) = self.client.credentials().set_user_profile(&profile) {
            warn!("Failed to cache user profile: {e}");
        }
        Ok(self.auth.dispatch(AuthAction::LoggedIn(profile)))
    }

    pub async fn logout(&self) -> AuthState {
        if let Err(e) = self.client.logout().await {
            warn!("Logout did not complete cleanly: {e}");
        }
        self.auth.dispatch(AuthAction::LoggedOut)
    }

    /// Delete the account; the local session ends only if the server agreed
    pub async fn delete_account(
        &self,
        request: AccountDeletionRequest,
    ) -> Result<AuthState, ClientError> {
        self.client.delete_account(request).await?;
        Ok(self.auth.dispatch(AuthAction::LoggedOut))
    }

    async fn load_profile(&self) {
        match self.client.my_page().await {
            Ok(profile) => {
                if let Err(e) = self.client.credentials().set_user_profile(&profile) {
                    warn!("Failed to cache user profile: {e}");
                }
                self.auth.dispatch(AuthAction::LoggedIn(profile));
            }
            Err(e) => warn!("Session restored but profile unavailable: {e}"),
        }
    }
}
