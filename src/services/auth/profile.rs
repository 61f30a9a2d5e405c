use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AuthService;
use crate::middlewares::require_jwt::invalidate_cached_user;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    auth::responses::UserInfoResponse,
    users::requests::UpdateProfileRequest,
};
use crate::services::{app_cache, current_user};
use crate::utils::dates::parse_date;

pub async fn handle_get_profile(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let roles = user.roles();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user, roles },
        "User information retrieved successfully",
    )))
}

pub async fn handle_update_profile(
    service: &AuthService,
    update: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    let mut errors = ValidationErrors::new();
    if let Some(name) = &update.first_name {
        errors.ensure(!name.trim().is_empty(), "first_name", "First name cannot be empty");
    }
    if let Some(date) = &update.birth_date
        && parse_date(date).is_err()
    {
        errors.add("birth_date", "Birth date must be in YYYY-MM-DD format");
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    let Some(updated) = storage.update_profile(&user.id, update).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        )));
    };

    invalidate_cached_user(&app_cache(request)?, &user.id).await;

    let roles = updated.roles();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse {
            user: updated,
            roles,
        },
        "Profile updated successfully",
    )))
}
