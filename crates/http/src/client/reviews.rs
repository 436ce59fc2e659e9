//! Review API client methods

use super::{ApiRequest, ClientError, SubsClient};
use crate::types::{Page, Review, ReviewDraft};

impl SubsClient {
    pub async fn reviews(
        &self,
        platform_id: u64,
        page: u32,
        size: u32,
    ) -> Result<Page<Review>, ClientError> {
        let request = ApiRequest::get(format!("/platforms/{platform_id}/reviews"))
            .query("page", page)
            .query("size", size);
        self.execute(request).await
    }

    pub async fn create_review(
        &self,
        platform_id: u64,
        draft: &ReviewDraft,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::post(format!("/platforms/{platform_id}/reviews")).json(draft)?;
        self.execute_empty(request).await
    }

    pub async fn update_review(
        &self,
        platform_id: u64,
        review_id: u64,
        draft: &ReviewDraft,
    ) -> Result<(), ClientError> {
        let request =
            ApiRequest::patch(format!("/platforms/{platform_id}/reviews/{review_id}")).json(draft)?;
        self.execute_empty(request).await
    }

    pub async fn delete_review(&self, platform_id: u64, review_id: u64) -> Result<(), ClientError> {
        self.delete(&format!("/platforms/{platform_id}/reviews/{review_id}"))
            .await
    }

    pub async fn recommend_review(
        &self,
        platform_id: u64,
        review_id: u64,
    ) -> Result<(), ClientError> {
        let request =
            ApiRequest::post(format!("/platforms/{platform_id}/reviews/{review_id}/recommend"));
        self.execute_empty(request).await
    }

    pub async fn cancel_recommendation(
        &self,
        platform_id: u64,
        review_id: u64,
    ) -> Result<(), ClientError> {
        self.delete(&format!("/platforms/{platform_id}/reviews/{review_id}/recommend"))
            .await
    }

    /// Recommend, or take back an existing recommendation
    pub async fn toggle_recommendation(&self, platform_id: u64, review: &Review) -> Result<(), ClientError> {
        if review.is_recommended {
            self.cancel_recommendation(platform_id, review.review_id).await
        } else {
            self.recommend_review(platform_id, review.review_id).await
        }
    }
}
