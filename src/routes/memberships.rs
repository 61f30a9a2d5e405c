use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::memberships::requests::{
    AcceptInvitationRequest, AdmissionListParams, CreateAdmissionRequest, CreateInvitationRequest,
    CreateParentChildRequest, MemberListParams,
};
use crate::services::MembershipService;
use crate::utils::SafeId;

static MEMBERSHIP_SERVICE: Lazy<MembershipService> = Lazy::new(MembershipService::new_lazy);

pub async fn my_memberships(req: HttpRequest) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.my_memberships(&req).await
}

pub async fn institution_members(
    req: HttpRequest,
    path: SafeId,
    query: web::Query<MemberListParams>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .institution_members(path.0, query.into_inner(), &req)
        .await
}

pub async fn create_invitation(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<CreateInvitationRequest>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .create_invitation(path.0, body.into_inner(), &req)
        .await
}

pub async fn list_invitations(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.list_invitations(path.0, &req).await
}

pub async fn accept_invitation(
    req: HttpRequest,
    body: web::Json<AcceptInvitationRequest>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .accept_invitation(body.into_inner(), &req)
        .await
}

pub async fn create_parent_child(
    req: HttpRequest,
    body: web::Json<CreateParentChildRequest>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .create_parent_child(body.into_inner(), &req)
        .await
}

pub async fn list_parent_child(req: HttpRequest) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.list_parent_child(&req).await
}

pub async fn create_admission(
    req: HttpRequest,
    body: web::Json<CreateAdmissionRequest>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .create_admission(body.into_inner(), &req)
        .await
}

pub async fn list_admissions(
    req: HttpRequest,
    query: web::Query<AdmissionListParams>,
) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE
        .list_admissions(query.into_inner(), &req)
        .await
}

pub async fn institution_requests(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.institution_requests(path.0, &req).await
}

pub async fn approve_admission(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.approve_admission(path.0, &req).await
}

pub async fn reject_admission(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    MEMBERSHIP_SERVICE.reject_admission(path.0, &req).await
}

// 配置路由
pub fn configure_membership_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/memberships")
            .wrap(RequireJWT)
            .route("/mine", web::get().to(my_memberships))
            .route(
                "/institutions/{id}/members",
                web::get().to(institution_members),
            )
            .service(
                web::resource("/institutions/{id}/invitations")
                    .route(web::get().to(list_invitations))
                    .route(web::post().to(create_invitation)),
            )
            .route(
                "/institutions/{id}/admissions",
                web::get().to(institution_requests),
            )
            .route("/invitations/accept", web::post().to(accept_invitation))
            .service(
                web::resource("/parent-child")
                    .route(web::get().to(list_parent_child))
                    .route(web::post().to(create_parent_child)),
            )
            .service(
                web::resource("/admissions")
                    .route(web::get().to(list_admissions))
                    .route(web::post().to(create_admission)),
            )
            .route("/admissions/{id}/approve", web::post().to(approve_admission))
            .route("/admissions/{id}/reject", web::post().to(reject_admission)),
    );
}
