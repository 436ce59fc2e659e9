//! Administration API client methods

use super::{ApiRequest, ClientError, SubsClient};
use crate::types::{MemberInfo, MemberSummary, Page, PlatformSummary};

impl SubsClient {
    pub async fn admin_members(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<MemberSummary>, ClientError> {
        let request = ApiRequest::get("/admin/members")
            .query("page", page)
            .query("size", size);
        self.execute(request).await
    }

    pub async fn admin_member(&self, member_id: u64) -> Result<MemberInfo, ClientError> {
        self.execute_data(ApiRequest::get(format!("/admin/members/{member_id}")))
            .await
    }

    /// Force-withdraw a member
    pub async fn admin_delete_member(&self, member_id: u64) -> Result<(), ClientError> {
        self.delete(&format!("/admin/members/{member_id}")).await
    }

    pub async fn admin_platforms(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<PlatformSummary>, ClientError> {
        let request = ApiRequest::get("/admin/platforms")
            .query("page", page)
            .query("size", size);
        self.execute(request).await
    }
}
