//! Membership API client methods

use super::{ApiRequest, ClientError, SubsClient};
use crate::types::{
    AccountDeletionRequest, EmailRequest, FindIdRequest, FindPasswordRequest, FoundId,
    PasswordChangeRequest, SignupRequest, VerifyCodeRequest,
};

// Sign-up and account recovery run without a session, so a 401 there is an
// ordinary failure and never triggers a token renewal.
impl SubsClient {
    /// Register a new member. A duplicate phone number is a `409`.
    pub async fn signup(&self, request: SignupRequest) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::post("/members").json(&request)?.without_renewal())
            .await
    }

    /// Send a verification code to `email`
    pub async fn send_verification_email(&self, email: &str) -> Result<(), ClientError> {
        let body = EmailRequest {
            email: email.to_string(),
        };
        self.execute_empty(ApiRequest::post("/members/send-email").json(&body)?.without_renewal())
            .await
    }

    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), ClientError> {
        let body = VerifyCodeRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        self.execute_empty(ApiRequest::post("/members/verify-code").json(&body)?.without_renewal())
            .await
    }

    /// Look up the account email registered for a phone number
    pub async fn find_id(&self, phone_number: &str) -> Result<String, ClientError> {
        let body = FindIdRequest {
            phone_number: phone_number.to_string(),
        };
        let found: FoundId = self
            .execute_data(ApiRequest::post("/members/findid").json(&body)?.without_renewal())
            .await?;
        Ok(found.email)
    }

    /// Have a temporary password mailed to the member
    pub async fn find_password(&self, request: FindPasswordRequest) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::post("/members/findpw").json(&request)?.without_renewal())
            .await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let body = PasswordChangeRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.execute_empty(ApiRequest::patch("/members/password").json(&body)?)
            .await
    }

    /// Delete the signed-in account and drop the local session
    pub async fn delete_account(&self, request: AccountDeletionRequest) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete("/members").json(&request)?)
            .await?;
        self.credentials().clear()?;
        Ok(())
    }
}
