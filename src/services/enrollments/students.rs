use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, admin_scope};
use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::entities::CurriculumLevel,
    enrollments::requests::{
        CreateStudentEnrollmentRequest, EnrollmentFilter, EnrollmentListParams,
        UpdateStudentEnrollmentRequest,
    },
    memberships::entities::MembershipRole,
};
use crate::services::{access, current_user};

pub async fn create_student_enrollment(
    service: &EnrollmentService,
    req: CreateStudentEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &req.institution_id).await?;

    if storage
        .get_membership(&req.institution_id, &req.user_id, MembershipRole::Student)
        .await?
        .is_none()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentInvalid,
            "User is not a student of this institution",
        )));
    }

    access::node_in_institution(
        &storage,
        &req.track_id,
        &req.institution_id,
        CurriculumLevel::Track,
    )
    .await?;
    let section = access::section_in_institution(&storage, &req.section_id, &req.institution_id)
        .await?;
    if section.track_id != req.track_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentInvalid,
            "Section does not belong to the track",
        )));
    }

    let enrollment = storage.create_student_enrollment(req).await?;
    info!(
        "Student enrollment {} created for {} by {}",
        enrollment.id, enrollment.user_id, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "Student enrollment created successfully",
    )))
}

pub async fn list_student_enrollments(
    service: &EnrollmentService,
    params: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let institution_ids = admin_scope(&storage, &user, params.institution_id).await?;

    let enrollments = storage
        .list_student_enrollments(
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
        "Student enrollments retrieved successfully",
    )))
}

pub async fn get_student_enrollment(
    service: &EnrollmentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(enrollment) = storage.get_student_enrollment(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Student enrollment not found",
        )));
    };
    if enrollment.user_id != user.id {
        access::ensure_institution_admin(&storage, &user, &enrollment.institution_id).await?;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Student enrollment retrieved successfully",
    )))
}

pub async fn update_student_enrollment(
    service: &EnrollmentService,
    id: String,
    update: UpdateStudentEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(enrollment) = storage.get_student_enrollment(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Student enrollment not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &enrollment.institution_id).await?;

    if update.track_id.is_some() || update.section_id.is_some() {
        let track_id = update.track_id.as_deref().unwrap_or(&enrollment.track_id);
        let section_id = update.section_id.as_deref().unwrap_or(&enrollment.section_id);
        access::node_in_institution(
            &storage,
            track_id,
            &enrollment.institution_id,
            CurriculumLevel::Track,
        )
        .await?;
        let section =
            access::section_in_institution(&storage, section_id, &enrollment.institution_id)
                .await?;
        if section.track_id != track_id {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentInvalid,
                "Section does not belong to the track",
            )));
        }
    }

    match storage.update_student_enrollment(&id, update).await? {
        Some(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Student enrollment updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Student enrollment not found",
        ))),
    }
}

pub async fn delete_student_enrollment(
    service: &EnrollmentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(enrollment) = storage.get_student_enrollment(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Student enrollment not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &enrollment.institution_id).await?;

    storage.delete_student_enrollment(&id).await?;
    info!("Student enrollment {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Student enrollment deleted successfully",
    )))
}

/// 授课教师查看分组学生名单
pub async fn students_by_section(
    service: &EnrollmentService,
    section_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(section) = storage.get_section(&section_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Section not found",
        )));
    };

    let is_admin = access::ensure_institution_admin(&storage, &user, &section.institution_id)
        .await
        .is_ok();
    if !is_admin {
        access::ensure_teaches_section(&storage, &user, &section.institution_id, &section.id)
            .await?;
    }

    let students = storage.list_section_students(&section.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        students,
        "Section students retrieved successfully",
    )))
}
