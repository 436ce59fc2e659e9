//! Wire types shared by the client and its callers
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Success body wrapped as `{ "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Paged list body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

// Auth

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub username: String,
    pub password: String,
}

/// Tokens issued on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Body of `POST /auth/token/refresh`.
///
/// `refreshToken` is only present when the backend rotates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// Members

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
    pub age: u32,
    pub gender: Gender,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindIdRequest {
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundId {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindPasswordRequest {
    pub email: String,
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Credentials re-entered to confirm account deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDeletionRequest {
    pub email: String,
    pub password: String,
}

/// Profile of the signed-in member, cached by the session layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub member_id: u64,
    #[serde(default)]
    pub email: Option<String>,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub image: Option<String>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Detailed member record (my info, admin detail)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    #[serde(default)]
    pub member_id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Row of the admin member table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub member_id: u64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Fields of a `PATCH /mypage/profile` form
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub age: u32,
    pub gender: Option<Gender>,
    /// Drop the current image and fall back to the placeholder
    pub delete_image: bool,
    pub image: Option<Upload>,
}

/// A file picked for upload
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: bytes::Bytes,
}

// Catalogue

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: u64,
    pub category_name: String,
    #[serde(default)]
    pub category_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    pub platform_id: u64,
    pub platform_name: String,
    #[serde(default)]
    pub platform_image: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub rating_avg: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsPlan {
    pub subs_plan_id: u64,
    pub plan_name: String,
    pub price: u64,
    #[serde(default)]
    pub billing_cycle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDetail {
    pub platform_id: u64,
    pub platform_name: String,
    #[serde(default)]
    pub platform_description: Option<String>,
    #[serde(default)]
    pub platform_image: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub service_at: Option<String>,
    #[serde(default)]
    pub rating_avg: f64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub plans: Vec<SubsPlan>,
}

/// Subscriber demographics; chart data is passed through as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatistics {
    #[serde(default)]
    pub gender_stats: std::collections::BTreeMap<String, u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl PlatformStatistics {
    pub fn total_subscribers(&self) -> u64 {
        self.gender_stats.values().sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainPage {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub platforms: Vec<PlatformSummary>,
}

/// Filters for `GET /platforms`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformQuery {
    pub page: u32,
    pub size: u32,
    pub keyword: Option<String>,
    pub sort: Option<String>,
    pub category_id: Option<u64>,
}

impl Default for PlatformQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 12,
            keyword: None,
            sort: None,
            category_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    pub plan_name: String,
    pub price: u64,
}

/// The `data` part of a platform creation form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlatform {
    pub platform_name: String,
    pub platform_description: String,
    pub category_id: u64,
    pub service_at: String,
    pub subs_plans: Vec<NewPlan>,
}

// Reviews

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: u64,
    pub member_id: u64,
    pub member_name: String,
    #[serde(default)]
    pub member_image: Option<String>,
    pub content: String,
    pub rating: u8,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub recommend_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub content: String,
    pub rating: u8,
}

// Subscriptions

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: u64,
    pub platform_id: u64,
    pub platform_name: String,
    #[serde(default)]
    pub platform_image: Option<String>,
    pub subs_plan_id: u64,
    #[serde(default)]
    pub subs_plan_name: Option<String>,
    #[serde(default)]
    pub subscription_start_at: Option<String>,
    #[serde(default)]
    pub billing_cycle: Option<String>,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub next_payment_date: Option<String>,
}

/// Body for creating or editing a subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionForm {
    pub platform_id: u64,
    pub subs_plan_id: u64,
    /// Start date, `YYYY-MM-DD`
    pub subscription_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_deserialize() {
        let page: Page<Review> = serde_json::from_value(json!({
            "data": [{
                "reviewId": 1,
                "memberId": 7,
                "memberName": "lee",
                "content": "good",
                "rating": 4,
                "recommendCount": 3
            }],
            "pageInfo": {"page": 1, "size": 10, "totalElements": 1, "totalPages": 1}
        }))
        .unwrap();

        assert_eq!(page.data[0].member_name, "lee");
        assert!(!page.data[0].is_recommended);
        assert_eq!(page.page_info.total_pages, 1);
    }

    #[test]
    fn test_user_profile_role() {
        let profile: UserProfile =
            serde_json::from_value(json!({"memberId": 1, "name": "admin", "role": "ADMIN"}))
                .unwrap();
        assert!(profile.is_admin());

        let profile: UserProfile =
            serde_json::from_value(json!({"memberId": 2, "name": "user"})).unwrap();
        assert!(!profile.is_admin());
    }

    #[test]
    fn test_statistics_keep_chart_data() {
        let stats: PlatformStatistics = serde_json::from_value(json!({
            "genderStats": {"MALE": 3, "FEMALE": 5},
            "ageStats": {"20": 4}
        }))
        .unwrap();

        assert_eq!(stats.total_subscribers(), 8);
        assert!(stats.extra.contains_key("ageStats"));
    }

    #[test]
    fn test_signup_serializes_camel_case() {
        let body = serde_json::to_value(SignupRequest {
            email: "a@b.c".into(),
            password: "pw".into(),
            name: "kim".into(),
            phone_number: "010-1234-5678".into(),
            age: 30,
            gender: Gender::Female,
        })
        .unwrap();

        assert_eq!(body["phoneNumber"], "010-1234-5678");
        assert_eq!(body["gender"], "FEMALE");
    }
}
