use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InstitutionService;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::current_user;

pub async fn get_institution(
    service: &InstitutionService,
    institution_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(institution) = storage.get_institution_by_id(&institution_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::InstitutionNotFound,
            "Institution not found",
        )));
    };

    let allowed = institution.admin_id == user.id
        || user.has_role(UserRole::Admin)
        || storage
            .list_user_memberships(&user.id)
            .await?
            .iter()
            .any(|m| m.institution_id == institution.id);

    if !allowed {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::InstitutionPermissionDenied,
            "You are not a member of this institution",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        institution,
        "Institution retrieved successfully",
    )))
}
