//! Authentication API client methods

use super::{ApiRequest, ClientError, SubsClient};
use crate::types::{LoginRequest, TokenPair};

impl SubsClient {
    /// Log in and persist the issued tokens.
    ///
    /// Rejected credentials come back as [`ClientError::Http`] with the
    /// server's message; they never touch the stored session.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenPair, ClientError> {
        let login = ApiRequest::post("/auth/login")
            .json(&request)?
            .without_renewal();
        let tokens: TokenPair = self.execute(login).await?;
        self.credentials().store_tokens(&tokens)?;
        info!("Logged in as {}", request.username);
        Ok(tokens)
    }

    /// End the session on the server and locally.
    ///
    /// The server call is best-effort; local credentials are cleared even if
    /// it fails. The session-end hook is not run for a deliberate logout.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.credentials().access_token().is_some() {
            let path = self.config().logout_path.clone();
            if let Err(e) = self.execute_empty(ApiRequest::post(path).without_renewal()).await {
                warn!("Server logout failed: {e}");
            }
        }
        self.credentials().clear()?;
        info!("Logged out");
        Ok(())
    }
}
