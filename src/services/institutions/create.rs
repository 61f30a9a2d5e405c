use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::InstitutionService;
use crate::models::{
    ApiResponse, ErrorCode, institutions::requests::CreateInstitutionRequest,
    users::entities::UserRole,
};
use crate::services::current_user;

pub async fn create_institution(
    service: &InstitutionService,
    req: CreateInstitutionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    if !user.has_role(UserRole::Institution) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::InstitutionPermissionDenied,
            "Only institution accounts can create an institution",
        )));
    }

    if let Err(resp) = req.validate().finish() {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    let institution = storage.create_institution(&user.id, req).await?;
    info!("Institution {} created by {}", institution.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        institution,
        "Institution created successfully",
    )))
}
