pub mod admissions;
pub mod invitations;
pub mod members;
pub mod parents;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::memberships::requests::{
    AcceptInvitationRequest, AdmissionListParams, CreateAdmissionRequest, CreateInvitationRequest,
    CreateParentChildRequest, MemberListParams,
};

crate::services::define_service!(MembershipService);

impl MembershipService {
    pub async fn my_memberships(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        members::my_memberships(self, request).await
    }

    pub async fn institution_members(
        &self,
        institution_id: String,
        params: MemberListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::institution_members(self, institution_id, params, request).await
    }

    // 邀请
    pub async fn create_invitation(
        &self,
        institution_id: String,
        req: CreateInvitationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        invitations::create_invitation(self, institution_id, req, request).await
    }

    pub async fn list_invitations(
        &self,
        institution_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        invitations::list_invitations(self, institution_id, request).await
    }

    pub async fn accept_invitation(
        &self,
        req: AcceptInvitationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        invitations::accept_invitation(self, req, request).await
    }

    // 家长关系
    pub async fn create_parent_child(
        &self,
        req: CreateParentChildRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        parents::create_parent_child(self, req, request).await
    }

    pub async fn list_parent_child(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        parents::list_parent_child(self, request).await
    }

    // 入学申请
    pub async fn create_admission(
        &self,
        req: CreateAdmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        admissions::create_admission(self, req, request).await
    }

    pub async fn list_admissions(
        &self,
        params: AdmissionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        admissions::list_admissions(self, params, request).await
    }

    pub async fn institution_requests(
        &self,
        institution_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        admissions::institution_requests(self, institution_id, request).await
    }

    pub async fn approve_admission(
        &self,
        request_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        admissions::process_admission(self, request_id, true, request).await
    }

    pub async fn reject_admission(
        &self,
        request_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        admissions::process_admission(self, request_id, false, request).await
    }
}
