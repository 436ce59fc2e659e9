//! Subscription API client methods

use super::{ApiRequest, ClientError, SubsClient};
use crate::types::{Subscription, SubscriptionForm};

impl SubsClient {
    pub async fn subscription(&self, subscription_id: u64) -> Result<Subscription, ClientError> {
        self.execute_data(ApiRequest::get(format!("/subscription/{subscription_id}")))
            .await
    }

    pub async fn create_subscription(&self, form: &SubscriptionForm) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::post("/subscription").json(form)?)
            .await
    }

    pub async fn update_subscription(
        &self,
        subscription_id: u64,
        form: &SubscriptionForm,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::patch(format!("/subscription/{subscription_id}")).json(form)?;
        self.execute_empty(request).await
    }

    pub async fn delete_subscription(&self, subscription_id: u64) -> Result<(), ClientError> {
        self.delete(&format!("/subscription/{subscription_id}")).await
    }
}
