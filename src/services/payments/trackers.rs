use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PaymentService;
use crate::models::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo,
    payments::requests::TrackerListParams,
};
use crate::services::{access, current_user, enrollments::admin_scope};

pub async fn list_trackers(
    service: &PaymentService,
    params: TrackerListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let institution_ids = admin_scope(&storage, &user, params.institution_id).await?;

    let trackers = if institution_ids.is_empty() {
        let (page, size) = params.pagination.normalized();
        PaginatedResponse::new(vec![], PaginationInfo::new(page, size, 0))
    } else {
        storage
            .list_trackers(&institution_ids, params.is_disbursed, params.pagination)
            .await?
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        trackers,
        "Payment trackers retrieved successfully",
    )))
}

pub async fn get_tracker(
    service: &PaymentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(tracker) = storage.get_tracker(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Payment tracker not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &tracker.institution_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        tracker,
        "Payment tracker retrieved successfully",
    )))
}

pub async fn disburse_tracker(
    service: &PaymentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(tracker) = storage.get_tracker(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Payment tracker not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &tracker.institution_id).await?;

    if tracker.is_disbursed {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaymentAlreadyDisbursed,
            "Payment has already been disbursed",
        )));
    }

    match storage.disburse_tracker(&id).await? {
        Some(tracker) => {
            info!("Tracker {} disbursed by {}", tracker.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                tracker,
                "Payment disbursed successfully",
            )))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Payment tracker not found",
        ))),
    }
}
