//! "My page" API client methods

use super::{ApiRequest, ClientError, FormPart, SubsClient};
use crate::types::{MemberInfo, ProfileUpdate, Subscription, UserProfile};
use serde_json::Value as JsonValue;

impl SubsClient {
    /// Profile header of the signed-in member
    pub async fn my_page(&self) -> Result<UserProfile, ClientError> {
        self.execute_data(ApiRequest::get("/mypage")).await
    }

    pub async fn my_info(&self) -> Result<MemberInfo, ClientError> {
        self.execute_data(ApiRequest::get("/mypage/info")).await
    }

    /// Subscriptions grouped by category, as the backend returns them
    pub async fn my_subscriptions(&self) -> Result<JsonValue, ClientError> {
        self.execute_data(ApiRequest::get("/mypage/subs")).await
    }

    pub async fn my_subscription_list(&self) -> Result<Vec<Subscription>, ClientError> {
        let grouped = self.my_subscriptions().await?;
        Ok(flatten_subscriptions(&grouped))
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), ClientError> {
        let mut parts = vec![
            FormPart::text("name", update.name),
            FormPart::text("age", update.age.to_string()),
            FormPart::text("deleteImage", update.delete_image.to_string()),
        ];
        if let Some(gender) = update.gender {
            parts.push(FormPart::text("gender", gender.as_str()));
        }
        if let Some(image) = update.image {
            parts.push(FormPart::file(
                "profileImage",
                image.file_name,
                image.mime,
                image.bytes,
            ));
        }

        self.execute_empty(ApiRequest::patch("/mypage/profile").multipart(parts))
            .await
    }
}

/// Collect every subscription from either a flat list or category groups
/// shaped like `[{ "categoryName": ..., "subscriptions": [...] }]`.
fn flatten_subscriptions(value: &JsonValue) -> Vec<Subscription> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .flat_map(|item| match item.get("subscriptions").and_then(JsonValue::as_array) {
            Some(nested) => nested.iter().collect::<Vec<_>>(),
            None => vec![item],
        })
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscription(id: u64) -> JsonValue {
        json!({
            "subscriptionId": id,
            "platformId": 1,
            "platformName": "Netflix",
            "subsPlanId": 2,
            "price": 13500
        })
    }

    #[test]
    fn test_flatten_grouped_subscriptions() {
        let grouped = json!([
            {"categoryName": "OTT", "subscriptions": [subscription(1), subscription(2)]},
            {"categoryName": "Music", "subscriptions": [subscription(3)]}
        ]);

        let ids: Vec<u64> = flatten_subscriptions(&grouped)
            .into_iter()
            .map(|s| s.subscription_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_flatten_flat_list_and_garbage() {
        assert_eq!(flatten_subscriptions(&json!([subscription(9)])).len(), 1);
        assert!(flatten_subscriptions(&json!({"unexpected": true})).is_empty());
    }
}
