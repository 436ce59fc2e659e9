//! Catalogue API client methods

use super::{ApiRequest, ClientError, FormPart, SubsClient};
use crate::types::{
    Category, MainPage, NewPlatform, Page, PlatformDetail, PlatformQuery, PlatformStatistics,
    PlatformSummary, Upload,
};

impl SubsClient {
    /// Landing page categories and featured platforms
    pub async fn main_page(&self) -> Result<MainPage, ClientError> {
        self.execute_data(ApiRequest::get("/main")).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.execute_data(ApiRequest::get("/categories")).await
    }

    /// Search platforms
    pub async fn platforms(&self, query: &PlatformQuery) -> Result<Page<PlatformSummary>, ClientError> {
        let request = ApiRequest::get("/platforms")
            .query("page", query.page)
            .query("size", query.size)
            .query_opt("keyword", query.keyword.as_deref().filter(|k| !k.is_empty()))
            .query_opt("sort", query.sort.as_deref().filter(|s| !s.is_empty()))
            .query_opt("categoryId", query.category_id);
        self.execute(request).await
    }

    pub async fn platform(&self, platform_id: u64) -> Result<PlatformDetail, ClientError> {
        self.execute_data(ApiRequest::get(format!("/platforms/{platform_id}")))
            .await
    }

    pub async fn platform_statistics(
        &self,
        platform_id: u64,
    ) -> Result<PlatformStatistics, ClientError> {
        self.execute_data(ApiRequest::get(format!("/platforms/{platform_id}/statistics")))
            .await
    }

    /// Create a platform (admin). Sent as `image` file plus a JSON `data` part.
    pub async fn create_platform(
        &self,
        platform: &NewPlatform,
        image: Upload,
    ) -> Result<(), ClientError> {
        let mut platform = platform.clone();
        platform
            .subs_plans
            .retain(|plan| !plan.plan_name.trim().is_empty() && plan.price > 0);

        let parts = vec![
            FormPart::file("image", image.file_name, image.mime, image.bytes),
            FormPart::text("data", serde_json::to_string(&platform)?),
        ];
        self.execute_empty(ApiRequest::post("/platforms").multipart(parts))
            .await
    }

    pub async fn delete_platform(&self, platform_id: u64) -> Result<(), ClientError> {
        self.delete(&format!("/platforms/{platform_id}")).await
    }
}
