use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, admin_scope};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::entities::CurriculumLevel,
    enrollments::requests::{
        CreateTeacherEnrollmentRequest, EnrollmentFilter, EnrollmentListParams,
        UpdateTeacherEnrollmentRequest,
    },
    memberships::entities::MembershipRole,
};
use crate::services::{access, current_user};
use crate::storage::Storage;

/// 所有引用的 track / section / subject 都属于该机构
async fn validate_targets(
    storage: &Arc<dyn Storage>,
    institution_id: &str,
    track_ids: &[String],
    section_ids: &[String],
    subject_ids: &[String],
) -> Result<()> {
    for id in track_ids {
        access::node_in_institution(storage, id, institution_id, CurriculumLevel::Track).await?;
    }
    for id in section_ids {
        let section = access::section_in_institution(storage, id, institution_id).await?;
        if !track_ids.is_empty() && !track_ids.contains(&section.track_id) {
            return Err(TutoriaError::validation(format!(
                "Section {id} is not in any of the assigned tracks"
            )));
        }
    }
    for id in subject_ids {
        let subject =
            access::node_in_institution(storage, id, institution_id, CurriculumLevel::Subject)
                .await?;
        if !track_ids.is_empty() && !track_ids.contains(&subject.track_id) {
            return Err(TutoriaError::validation(format!(
                "Subject {id} is not in any of the assigned tracks"
            )));
        }
    }
    Ok(())
}

pub async fn create_teacher_enrollment(
    service: &EnrollmentService,
    req: CreateTeacherEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &req.institution_id).await?;

    if storage
        .get_membership(&req.institution_id, &req.user_id, MembershipRole::Teacher)
        .await?
        .is_none()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentInvalid,
            "User is not a teacher of this institution",
        )));
    }

    if let Err(e) = validate_targets(
        &storage,
        &req.institution_id,
        &req.track_ids,
        &req.section_ids,
        &req.subject_ids,
    )
    .await
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentInvalid,
            e.message(),
        )));
    }

    let enrollment = storage.create_teacher_enrollment(req).await?;
    info!(
        "Teacher enrollment {} created for {} by {}",
        enrollment.id, enrollment.user_id, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "Teacher enrollment created successfully",
    )))
}

pub async fn list_teacher_enrollments(
    service: &EnrollmentService,
    params: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let institution_ids = admin_scope(&storage, &user, params.institution_id).await?;

    let enrollments = storage
        .list_teacher_enrollments(
            EnrollmentFilter {
                institution_ids: Some(institution_ids),
                user_id: params.user_id,
                track_id: params.track_id,
                section_id: params.section_id,
                only_active: false,
            },
            params.pagination,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollments,
        "Teacher enrollments retrieved successfully",
    )))
}

pub async fn get_teacher_enrollment(
    service: &EnrollmentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(enrollment) = storage.get_teacher_enrollment(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Teacher enrollment not found",
        )));
    };
    // 教师本人也可以查看
    if enrollment.user_id != user.id {
        access::ensure_institution_admin(&storage, &user, &enrollment.institution_id).await?;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Teacher enrollment retrieved successfully",
    )))
}

pub async fn update_teacher_enrollment(
    service: &EnrollmentService,
    id: String,
    update: UpdateTeacherEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(enrollment) = storage.get_teacher_enrollment(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Teacher enrollment not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &enrollment.institution_id).await?;

    let track_ids = update.track_ids.as_ref().unwrap_or(&enrollment.track_ids);
    let section_ids = update.section_ids.as_ref().unwrap_or(&enrollment.section_ids);
    let subject_ids = update.subject_ids.as_ref().unwrap_or(&enrollment.subject_ids);
    if let Err(e) = validate_targets(
        &storage,
        &enrollment.institution_id,
        track_ids,
        section_ids,
        subject_ids,
    )
    .await
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentInvalid,
            e.message(),
        )));
    }

    match storage.update_teacher_enrollment(&id, update).await? {
        Some(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Teacher enrollment updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Teacher enrollment not found",
        ))),
    }
}

pub async fn delete_teacher_enrollment(
    service: &EnrollmentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(enrollment) = storage.get_teacher_enrollment(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Teacher enrollment not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &enrollment.institution_id).await?;

    storage.delete_teacher_enrollment(&id).await?;
    info!("Teacher enrollment {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Teacher enrollment deleted successfully",
    )))
}
