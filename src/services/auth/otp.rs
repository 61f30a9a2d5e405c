use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{AuthService, find_by_identifier};
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    auth::{
        requests::{CheckUserRequest, VerifyOtpRequest},
        responses::{CheckUserResponse, LoginResponse},
    },
};
use crate::services::{app_cache, notify};
use crate::utils::jwt::JwtUtils;
use crate::utils::validate::{Identifier, normalize_phone_number};

pub async fn handle_verify_otp(
    service: &AuthService,
    req: VerifyOtpRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let cache = app_cache(request)?;
    let identifier = Identifier::parse(&req.identifier);

    let user = match find_by_identifier(&storage, &identifier).await? {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
    };

    if user.is_active {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "User is already verified",
        )));
    }

    if !notify::check_otp(&cache, &identifier, &req.otp).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::OtpInvalid,
            "Invalid or expired OTP",
        )));
    }

    storage.activate_user(&user.id).await?;
    notify::clear_otp(&cache, &identifier).await;

    let mut user = user;
    user.is_active = true;

    let token_pair = match user.generate_token_pair() {
        Ok(pair) => pair,
        Err(e) => {
            error!("{}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Verification succeeded but token generation failed",
                )),
            );
        }
    };
    info!("User {} verified", user.id);

    let roles = user.roles();
    let cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);
    Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
        LoginResponse {
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            expires_in: service.get_config().jwt.access_token_expiry * 60,
            user,
            roles,
        },
        "Account verified successfully",
    )))
}

pub async fn handle_check_user(
    service: &AuthService,
    req: CheckUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identifier = match (req.email.as_deref(), req.phone_number.as_deref()) {
        (Some(email), _) if !email.trim().is_empty() => {
            Identifier::Email(email.trim().to_lowercase())
        }
        (_, Some(phone)) if !phone.trim().is_empty() => {
            Identifier::Phone(normalize_phone_number(phone))
        }
        _ => {
            return Ok(
                ValidationErrors::single("email", "Either email or phone number is required")
                    .into_response(),
            );
        }
    };

    let storage = service.get_storage(request)?;
    let user = find_by_identifier(&storage, &identifier).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CheckUserResponse {
            exists: user.is_some(),
            is_active: user.is_some_and(|u| u.is_active),
        },
        "User check completed",
    )))
}
