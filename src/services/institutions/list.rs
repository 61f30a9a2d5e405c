use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InstitutionService;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::current_user;

pub async fn list_institutions(
    service: &InstitutionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let institutions = if user.has_role(UserRole::Admin) {
        storage.list_all_institutions().await?
    } else {
        storage.list_institutions_by_admin(&user.id).await?
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        institutions,
        "Institutions retrieved successfully",
    )))
}

// 当前账号管理的机构
pub async fn my_institution(
    service: &InstitutionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .list_institutions_by_admin(&user.id)
        .await?
        .into_iter()
        .next()
    {
        Some(institution) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            institution,
            "Institution retrieved successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::InstitutionNotFound,
            "You do not manage any institution",
        ))),
    }
}
