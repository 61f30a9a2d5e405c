use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{
    PaymentService,
    bkash::{BkashClient, GatewayPaymentStatus},
};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo,
    enrollments::{entities::StudentEnrollment, requests::EnrollmentFilter},
    payments::{
        entities::PaymentStatus,
        requests::{
            CreateFeePaymentRequest, FeePaymentFilter, FeePaymentListParams, NewFeePayment,
        },
        responses::{CreateFeePaymentResponse, ExecutePaymentResponse},
    },
    users::entities::User,
};
use crate::services::{
    access, app_cache, current_user, fees::quote_for_enrollment,
    fees::resolve::ensure_can_view_enrollment, homeworks::child_ids,
};
use crate::storage::Storage;
use crate::utils::dates::{format_date, parse_month, year_month_code};
use crate::utils::money::decimal_to_minor;

pub fn invoice_number(enrollment_id: &str, month: chrono::NaiveDate) -> String {
    format!("FEE-{enrollment_id}-{}", year_month_code(month))
}

/// 网关错误保留原因，不按内部错误隐藏
pub(crate) fn gateway_failure(err: TutoriaError) -> ActixResult<HttpResponse> {
    match err {
        TutoriaError::ExternalService(msg) => Ok(HttpResponse::BadGateway().json(
            ApiResponse::error_empty(ErrorCode::PaymentGatewayError, msg),
        )),
        e => Err(e.into()),
    }
}

/// 学生本人或其家长
async fn ensure_payer(
    storage: &Arc<dyn Storage>,
    user: &User,
    enrollment: &StudentEnrollment,
) -> Result<()> {
    if enrollment.user_id == user.id {
        return Ok(());
    }
    access::ensure_parent_of(storage, user, &enrollment.user_id)
        .await
        .map_err(|_| {
            TutoriaError::authorization("Only the student or a linked parent can pay this fee")
        })
}

pub async fn create_fee_payment(
    service: &PaymentService,
    req: CreateFeePaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(enrollment) = storage.get_student_enrollment(&req.enrollment_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Student enrollment not found",
        )));
    };
    ensure_payer(&storage, &user, &enrollment).await?;

    let Ok(month) = parse_month(&req.month) else {
        return Ok(crate::models::ValidationErrors::single(
            "month",
            "Month must be in YYYY-MM or YYYY-MM-DD format",
        )
        .into_response());
    };
    let month_key = format_date(month);

    if storage
        .find_open_fee_payment(&enrollment.id, &month_key)
        .await?
        .is_some()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaymentDuplicate,
            "A pending or completed payment already exists for this month",
        )));
    }

    let quote = match quote_for_enrollment(&storage, &enrollment).await {
        Ok(quote) => quote,
        Err(TutoriaError::Validation(msg)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FeeNotConfigured,
                msg,
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let invoice = invoice_number(&enrollment.id, month);
    let client = BkashClient::new(app_cache(request)?)?;
    let created = match client.create_payment(quote.payable, &invoice).await {
        Ok(created) => created,
        Err(e) => {
            warn!("bKash create failed for {}: {}", invoice, e);
            return gateway_failure(e);
        }
    };

    let fee_payment = storage
        .create_fee_payment(NewFeePayment {
            payment_id: created.payment_id.clone(),
            invoice_number: invoice,
            enrollment_id: enrollment.id.clone(),
            institution_id: enrollment.institution_id.clone(),
            month: month_key,
            amount_minor: decimal_to_minor(quote.payable)?,
            scholarship_minor: decimal_to_minor(quote.discount)?,
            paid_by: user.id.clone(),
        })
        .await?;
    info!(
        "Fee payment {} ({}) initiated by {} for enrollment {}",
        fee_payment.id, created.payment_id, user.id, enrollment.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreateFeePaymentResponse {
            payment_id: created.payment_id,
            bkash_url: created.bkash_url,
            fee_payment_id: fee_payment.id,
            amount: fee_payment.amount,
            scholarship_amount: fee_payment.scholarship_amount,
        },
        "Payment created successfully",
    )))
}

/// 本人及子女的全部注册记录
async fn learner_enrollment_ids(storage: &Arc<dyn Storage>, user: &User) -> Result<Vec<String>> {
    let mut learners = child_ids(storage, user).await?;
    if user.is_student {
        learners.push(user.id.clone());
    }
    let mut ids = Vec::new();
    for learner in learners {
        let enrollments = storage
            .list_all_student_enrollments(EnrollmentFilter {
                user_id: Some(learner),
                ..Default::default()
            })
            .await?;
        ids.extend(enrollments.into_iter().map(|e| e.id));
    }
    Ok(ids)
}

pub async fn list_fee_payments(
    service: &PaymentService,
    params: FeePaymentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut filter = FeePaymentFilter {
        status: params.status,
        ..Default::default()
    };
    if let Some(institution_id) = params.institution_id {
        access::ensure_institution_admin(&storage, &user, &institution_id).await?;
        filter.institution_ids = Some(vec![institution_id]);
    } else {
        let enrollment_ids = learner_enrollment_ids(&storage, &user).await?;
        if enrollment_ids.is_empty() {
            filter.institution_ids = Some(access::admin_institution_ids(&storage, &user).await?);
        } else {
            filter.enrollment_ids = Some(enrollment_ids);
        }
    }

    let empty = matches!(&filter.institution_ids, Some(ids) if ids.is_empty());
    let payments = if empty {
        let (page, size) = params.pagination.normalized();
        PaginatedResponse::new(vec![], PaginationInfo::new(page, size, 0))
    } else {
        storage.list_fee_payments(filter, params.pagination).await?
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        payments,
        "Fee payments retrieved successfully",
    )))
}

pub async fn get_fee_payment(
    service: &PaymentService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(payment) = storage.get_fee_payment(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Fee payment not found",
        )));
    };
    match storage.get_student_enrollment(&payment.enrollment_id).await? {
        Some(enrollment) => ensure_can_view_enrollment(&storage, &user, &enrollment).await?,
        None => {
            access::ensure_institution_admin(&storage, &user, &payment.institution_id).await?;
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        payment,
        "Fee payment retrieved successfully",
    )))
}

/// 网关结果对应的本地终态
fn settled_status(result: GatewayPaymentStatus) -> (PaymentStatus, Option<String>) {
    if result.is_completed() {
        (PaymentStatus::Completed, result.trx_id)
    } else {
        (PaymentStatus::Failed, None)
    }
}

/// 网关回调或付款人主动确认
///
/// 回调无需认证，状态一律以网关为准：回调为 success 时向网关执行，
/// 其余状态向网关查询，查询失败时不改动本地记录。
/// 已完成的支付重复执行时原样返回。
pub async fn execute_payment(
    service: &PaymentService,
    payment_id: String,
    callback_status: Option<String>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(existing) = storage.get_bkash_payment(&payment_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Payment not found",
        )));
    };
    if existing.status == PaymentStatus::Completed {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExecutePaymentResponse {
                payment_id: existing.payment_id,
                status: existing.status,
                trx_id: existing.trx_id,
            },
            "Payment already completed",
        )));
    }

    let client = BkashClient::new(app_cache(request)?)?;
    let (status, trx_id) = match callback_status.as_deref() {
        Some(s) if !s.eq_ignore_ascii_case("success") => {
            let caller = request
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string();
            info!(
                "bKash callback for {} reported {} from {}, querying gateway",
                payment_id, s, caller
            );
            match client.query_payment(&payment_id).await {
                Ok(result) => settled_status(result),
                Err(e) => {
                    warn!("bKash query for {} failed: {}", payment_id, e);
                    return gateway_failure(e);
                }
            }
        }
        _ => match client.execute_payment(&payment_id).await {
            Ok(result) => {
                if !result.is_completed() {
                    warn!(
                        "bKash execute for {} not completed: {}",
                        payment_id,
                        result
                            .status_message
                            .clone()
                            .or(result.transaction_status.clone())
                            .unwrap_or_default()
                    );
                }
                settled_status(result)
            }
            Err(e @ TutoriaError::ServiceUnavailable(_)) => return Err(e.into()),
            Err(e) => {
                warn!("bKash execute for {} failed: {}", payment_id, e);
                (PaymentStatus::Failed, None)
            }
        },
    };

    let Some(updated) = storage.finish_payment(&payment_id, status, trx_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Payment not found",
        )));
    };
    info!("Payment {} marked {}", updated.payment_id, updated.status);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ExecutePaymentResponse {
            payment_id: updated.payment_id,
            status: updated.status,
            trx_id: updated.trx_id,
        },
        format!("Payment {}", updated.status),
    )))
}

pub async fn query_payment(
    service: &PaymentService,
    payment_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(payment) = storage.get_bkash_payment(&payment_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Payment not found",
        )));
    };
    if payment.payer_id != user.id && !user.is_staff {
        return Err(TutoriaError::authorization("You did not make this payment").into());
    }

    let client = BkashClient::new(app_cache(request)?)?;
    match client.query_payment(&payment_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            status,
            "Payment status retrieved successfully",
        ))),
        Err(e) => gateway_failure(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_invoice_number_uses_year_month() {
        let month = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(invoice_number("enr-1", month), "FEE-enr-1-202503");
    }

    #[test]
    fn test_gateway_failure_keeps_reason() {
        let resp =
            gateway_failure(TutoriaError::external_service("Payment creation failed: 2001"))
                .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        assert!(gateway_failure(TutoriaError::service_unavailable("down")).is_err());
    }

    #[test]
    fn test_only_gateway_completion_settles_as_completed() {
        let completed = GatewayPaymentStatus {
            transaction_status: Some("Completed".to_string()),
            trx_id: Some("TRX9".to_string()),
            ..Default::default()
        };
        assert_eq!(
            settled_status(completed),
            (PaymentStatus::Completed, Some("TRX9".to_string()))
        );

        let initiated = GatewayPaymentStatus {
            transaction_status: Some("Initiated".to_string()),
            trx_id: Some("TRX9".to_string()),
            ..Default::default()
        };
        assert_eq!(settled_status(initiated), (PaymentStatus::Failed, None));
    }
}
