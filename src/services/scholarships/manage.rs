use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScholarshipService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    scholarships::requests::{
        CreateScholarshipRequest, ScholarshipListParams, UpdateScholarshipRequest,
    },
};
use crate::services::{access, current_user, enrollments::admin_scope};
use crate::utils::money::{percent_to_hundredths, validate_percentage};

pub async fn create_scholarship(
    service: &ScholarshipService,
    req: CreateScholarshipRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &req.institution_id).await?;

    if let Err(msg) = validate_percentage(req.percentage) {
        return Ok(ValidationErrors::single("percentage", msg).into_response());
    }

    match storage
        .get_student_enrollment(&req.student_enrollment_id)
        .await?
    {
        Some(e) if e.institution_id == req.institution_id => {}
        _ => {
            return Ok(ValidationErrors::single(
                "student_enrollment_id",
                "Student enrollment not found in this institution",
            )
            .into_response());
        }
    }

    if storage
        .find_scholarship_by_enrollment(&req.student_enrollment_id)
        .await?
        .is_some()
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "A scholarship already exists for this enrollment",
        )));
    }

    let scholarship = storage
        .create_scholarship(
            &req.institution_id,
            &req.student_enrollment_id,
            percent_to_hundredths(req.percentage)?,
            req.is_active,
        )
        .await?;
    info!(
        "Scholarship {} ({}%) created by {}",
        scholarship.id, scholarship.percentage, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        scholarship,
        "Scholarship created successfully",
    )))
}

pub async fn list_scholarships(
    service: &ScholarshipService,
    params: ScholarshipListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let institution_ids = admin_scope(&storage, &user, params.institution_id).await?;

    let scholarships = storage.list_scholarships(&institution_ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        scholarships,
        "Scholarships retrieved successfully",
    )))
}

pub async fn get_scholarship(
    service: &ScholarshipService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(scholarship) = storage.get_scholarship(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Scholarship not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &scholarship.institution_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        scholarship,
        "Scholarship retrieved successfully",
    )))
}

pub async fn update_scholarship(
    service: &ScholarshipService,
    id: String,
    req: UpdateScholarshipRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(scholarship) = storage.get_scholarship(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Scholarship not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &scholarship.institution_id).await?;

    let percentage = match req.percentage {
        Some(pct) => {
            if let Err(msg) = validate_percentage(pct) {
                return Ok(ValidationErrors::single("percentage", msg).into_response());
            }
            Some(percent_to_hundredths(pct)?)
        }
        None => None,
    };

    match storage
        .update_scholarship(&id, percentage, req.is_active)
        .await?
    {
        Some(scholarship) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            scholarship,
            "Scholarship updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Scholarship not found",
        ))),
    }
}

pub async fn delete_scholarship(
    service: &ScholarshipService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(scholarship) = storage.get_scholarship(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Scholarship not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &scholarship.institution_id).await?;

    storage.delete_scholarship(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Scholarship deleted successfully",
    )))
}
