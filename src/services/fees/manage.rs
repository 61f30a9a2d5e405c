use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    curriculum::entities::CurriculumLevel,
    fees::{
        entities::FeeScope,
        requests::{CreateFeeRequest, FeeListParams, UpdateFeeRequest},
    },
};
use crate::services::{access, current_user, enrollments::admin_scope};
use crate::utils::money::{decimal_to_minor, validate_amount};

pub async fn create_fee(
    service: &FeeService,
    req: CreateFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &req.institution_id).await?;

    if let Err(msg) = validate_amount(req.amount) {
        return Ok(ValidationErrors::single("amount", msg).into_response());
    }

    // 机构级目标就是机构本身
    let target_id = match (req.scope, req.target_id.as_deref()) {
        (FeeScope::Institution, _) => req.institution_id.clone(),
        (FeeScope::Track, Some(track_id)) => {
            access::node_in_institution(
                &storage,
                track_id,
                &req.institution_id,
                CurriculumLevel::Track,
            )
            .await?;
            track_id.to_string()
        }
        (FeeScope::Student, Some(enrollment_id)) => {
            match storage.get_student_enrollment(enrollment_id).await? {
                Some(e) if e.institution_id == req.institution_id => e.id,
                _ => {
                    return Ok(ValidationErrors::single(
                        "target_id",
                        "Student enrollment not found in this institution",
                    )
                    .into_response());
                }
            }
        }
        (_, None) => {
            return Ok(
                ValidationErrors::single("target_id", "target_id is required for this scope")
                    .into_response(),
            );
        }
    };

    let fee = storage
        .create_fee_setting(
            &req.institution_id,
            req.scope,
            &target_id,
            decimal_to_minor(req.amount)?,
        )
        .await?;
    info!("Fee setting {} ({}) created by {}", fee.id, fee.scope, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        fee,
        "Fee setting created successfully",
    )))
}

pub async fn list_fees(
    service: &FeeService,
    params: FeeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let institution_ids = admin_scope(&storage, &user, params.institution_id).await?;

    let fees = storage
        .list_fee_settings(&institution_ids, params.scope)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        fees,
        "Fee settings retrieved successfully",
    )))
}

pub async fn get_fee(
    service: &FeeService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(fee) = storage.get_fee_setting(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Fee setting not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &fee.institution_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        fee,
        "Fee setting retrieved successfully",
    )))
}

pub async fn update_fee(
    service: &FeeService,
    id: String,
    req: UpdateFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(fee) = storage.get_fee_setting(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Fee setting not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &fee.institution_id).await?;

    if let Err(msg) = validate_amount(req.amount) {
        return Ok(ValidationErrors::single("amount", msg).into_response());
    }

    match storage
        .update_fee_setting(&id, decimal_to_minor(req.amount)?)
        .await?
    {
        Some(fee) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            fee,
            "Fee setting updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Fee setting not found",
        ))),
    }
}

pub async fn delete_fee(
    service: &FeeService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(fee) = storage.get_fee_setting(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Fee setting not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &fee.institution_id).await?;

    storage.delete_fee_setting(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Fee setting deleted successfully",
    )))
}
