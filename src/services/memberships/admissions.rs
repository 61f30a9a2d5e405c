use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MembershipService;
use crate::middlewares::require_jwt::invalidate_cached_user;
use crate::models::{
    ApiResponse, ErrorCode,
    memberships::{
        entities::{AdmissionStatus, MembershipRole},
        requests::{AdmissionListParams, CreateAdmissionRequest},
    },
    users::entities::UserRole,
};
use crate::services::{access, app_cache, current_user};

pub async fn create_admission(
    service: &MembershipService,
    req: CreateAdmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    if !user.has_role(UserRole::AdmissionSeeker) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only admission seekers can request admission",
        )));
    }

    let storage = service.get_storage(request)?;
    if storage
        .get_institution_by_id(&req.institution_id)
        .await?
        .is_none()
    {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::InstitutionNotFound,
            "Institution not found",
        )));
    }

    if storage
        .get_membership(&req.institution_id, &user.id, MembershipRole::Student)
        .await?
        .is_some()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AdmissionRequestInvalid,
            "You are already a student of this institution",
        )));
    }

    if storage
        .find_pending_admission_request(&user.id, &req.institution_id)
        .await?
        .is_some()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AdmissionRequestInvalid,
            "You already have a pending request for this institution",
        )));
    }

    let admission = storage
        .create_admission_request(&user.id, &req.institution_id, req.message)
        .await?;
    info!(
        "Admission request {} created by {} for {}",
        admission.id, user.id, admission.institution_id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        admission,
        "Admission request submitted successfully",
    )))
}

pub async fn list_admissions(
    service: &MembershipService,
    params: AdmissionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let requests = storage
        .list_admission_requests_by_user(&user.id, params.status)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        requests,
        "Admission requests retrieved successfully",
    )))
}

pub async fn institution_requests(
    service: &MembershipService,
    institution_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &institution_id).await?;

    let requests = storage
        .list_admission_requests_by_institution(&institution_id, Some(AdmissionStatus::Pending))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        requests,
        "Pending admission requests retrieved successfully",
    )))
}

/// 批准或拒绝待处理的入学申请
pub async fn process_admission(
    service: &MembershipService,
    request_id: String,
    approve: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(admission) = storage.get_admission_request(&request_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Admission request not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &admission.institution_id).await?;

    if admission.status != AdmissionStatus::Pending {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AdmissionRequestInvalid,
            format!("Admission request is already {}", admission.status),
        )));
    }

    let (processed, message) = if approve {
        (
            Some(storage.approve_admission_request(&request_id, &user.id).await?),
            "Admission request approved",
        )
    } else {
        (
            storage.reject_admission_request(&request_id, &user.id).await?,
            "Admission request rejected",
        )
    };

    match processed {
        Some(admission) => {
            // 申请人获得学生身份
            if approve {
                invalidate_cached_user(&app_cache(request)?, &admission.user_id).await;
            }
            info!("{} ({}) by {}", message, admission.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(admission, message)))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Admission request not found",
        ))),
    }
}
