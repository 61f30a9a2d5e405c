use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AuthService, find_by_identifier};
use crate::middlewares::require_jwt::invalidate_cached_user;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    auth::requests::{ChangePasswordRequest, ForgotPasswordRequest, ResetPasswordRequest},
};
use crate::services::{app_cache, current_user, notify};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{Identifier, validate_password};

fn password_policy_errors(field: &str, password: &str) -> Option<HttpResponse> {
    let policy = validate_password(password);
    if policy.is_valid {
        return None;
    }
    let mut errors = ValidationErrors::new();
    for msg in policy.errors {
        errors.add(field, msg);
    }
    Some(errors.into_response())
}

pub async fn handle_forgot_password(
    service: &AuthService,
    req: ForgotPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let cache = app_cache(request)?;
    let identifier = Identifier::parse(&req.identifier);

    if find_by_identifier(&storage, &identifier).await?.is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        )));
    }

    notify::issue_otp(&cache, &identifier, "password reset").await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "OTP sent for password reset",
    )))
}

pub async fn handle_reset_password(
    service: &AuthService,
    req: ResetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(resp) = password_policy_errors("new_password", &req.new_password) {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    let cache = app_cache(request)?;
    let identifier = Identifier::parse(&req.identifier);

    let Some(user) = find_by_identifier(&storage, &identifier).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        )));
    };

    if !notify::check_otp(&cache, &identifier, &req.otp).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::OtpInvalid,
            "Invalid or expired OTP",
        )));
    }

    storage
        .update_password(&user.id, &hash_password(&req.new_password)?)
        .await?;
    notify::clear_otp(&cache, &identifier).await;
    invalidate_cached_user(&cache, &user.id).await;
    info!("Password reset for user {}", user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Password reset successfully",
    )))
}

pub async fn handle_change_password(
    service: &AuthService,
    req: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 缓存中的用户不含密码哈希，需要回库确认
    let stored = storage.get_user_by_id(&user.id).await?;
    if !stored.is_some_and(|u| verify_password(&req.old_password, &u.password_hash)) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Old password is incorrect",
        )));
    }

    if let Some(resp) = password_policy_errors("new_password", &req.new_password) {
        return Ok(resp);
    }

    storage
        .update_password(&user.id, &hash_password(&req.new_password)?)
        .await?;
    invalidate_cached_user(&app_cache(request)?, &user.id).await;
    info!("Password changed for user {}", user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Password changed successfully",
    )))
}
