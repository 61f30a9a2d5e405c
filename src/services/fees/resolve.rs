use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::entities::StudentEnrollment,
    fees::{
        entities::{FeeScope, FeeSetting},
        responses::FeeQuoteResponse,
    },
    users::entities::User,
};
use crate::services::{access, current_user};
use crate::storage::Storage;
use crate::utils::money::apply_scholarship;

/// 学费查找顺序：学生 → track → 机构
pub fn fee_lookup_order(enrollment: &StudentEnrollment) -> [(FeeScope, &str); 3] {
    [
        (FeeScope::Student, enrollment.id.as_str()),
        (FeeScope::Track, enrollment.track_id.as_str()),
        (FeeScope::Institution, enrollment.institution_id.as_str()),
    ]
}

pub async fn resolve_fee(
    storage: &Arc<dyn Storage>,
    enrollment: &StudentEnrollment,
) -> Result<FeeSetting> {
    for (scope, target_id) in fee_lookup_order(enrollment) {
        if let Some(fee) = storage.find_fee_setting(scope, target_id).await? {
            return Ok(fee);
        }
    }
    Err(TutoriaError::validation("No default fee set"))
}

/// 计算入学记录的应缴金额（含有效奖学金）
pub async fn quote_for_enrollment(
    storage: &Arc<dyn Storage>,
    enrollment: &StudentEnrollment,
) -> Result<FeeQuoteResponse> {
    let fee = resolve_fee(storage, enrollment).await?;
    let percentage = storage
        .find_scholarship_by_enrollment(&enrollment.id)
        .await?
        .filter(|s| s.is_active)
        .map(|s| s.percentage);
    let breakdown = apply_scholarship(fee.amount, percentage);

    Ok(FeeQuoteResponse {
        enrollment_id: enrollment.id.clone(),
        scope: fee.scope,
        base_fee: breakdown.base_fee,
        scholarship_percentage: percentage,
        discount: breakdown.discount,
        payable: breakdown.payable,
    })
}

/// 学生本人、关联家长或机构管理员
pub(crate) async fn ensure_can_view_enrollment(
    storage: &Arc<dyn Storage>,
    user: &User,
    enrollment: &StudentEnrollment,
) -> Result<()> {
    if enrollment.user_id == user.id
        || access::ensure_parent_of(storage, user, &enrollment.user_id)
            .await
            .is_ok()
    {
        return Ok(());
    }
    access::ensure_institution_admin(storage, user, &enrollment.institution_id)
        .await
        .map(|_| ())
}

pub async fn enrollment_fee(
    service: &FeeService,
    enrollment_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(enrollment) = storage.get_student_enrollment(&enrollment_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Student enrollment not found",
        )));
    };
    ensure_can_view_enrollment(&storage, &user, &enrollment).await?;

    match quote_for_enrollment(&storage, &enrollment).await {
        Ok(quote) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            quote,
            "Fee retrieved successfully",
        ))),
        Err(TutoriaError::Validation(msg)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::FeeNotConfigured, msg),
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_prefers_student_then_track() {
        let enrollment = StudentEnrollment {
            id: "enr".to_string(),
            institution_id: "inst".to_string(),
            user_id: "stu".to_string(),
            track_id: "track".to_string(),
            section_id: "sec".to_string(),
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let order = fee_lookup_order(&enrollment);
        assert_eq!(order[0], (FeeScope::Student, "enr"));
        assert_eq!(order[1], (FeeScope::Track, "track"));
        assert_eq!(order[2], (FeeScope::Institution, "inst"));
    }
}
