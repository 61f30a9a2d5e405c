use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::InstitutionService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors, institutions::requests::UpdateInstitutionRequest,
};
use crate::services::{access, current_user};

pub async fn update_institution(
    service: &InstitutionService,
    institution_id: String,
    update: UpdateInstitutionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &institution_id).await?;

    let mut errors = ValidationErrors::new();
    if let Some(name) = &update.name {
        errors.ensure(!name.trim().is_empty(), "name", "Name cannot be empty");
    }
    if let Some(code) = &update.short_code {
        errors.ensure(
            !code.trim().is_empty() && code.len() <= 32,
            "short_code",
            "Short code must be 1-32 characters",
        );
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    match storage.update_institution(&institution_id, update).await? {
        Some(institution) => {
            info!("Institution {} updated by {}", institution.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                institution,
                "Institution updated successfully",
            )))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::InstitutionNotFound,
            "Institution not found",
        ))),
    }
}
