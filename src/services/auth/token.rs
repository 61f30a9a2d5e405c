use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AuthService;
use crate::middlewares::require_jwt::{bearer_token, invalidate_cached_user};
use crate::models::auth::{requests::RefreshTokenRequest, responses::RefreshTokenResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::app_cache;
use crate::utils::jwt;

pub async fn handle_refresh_token(
    service: &AuthService,
    req: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    // 请求体优先，其次 cookie
    let refresh_token = req
        .refresh_token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| jwt::JwtUtils::extract_refresh_token_from_cookie(request));

    let Some(refresh_token) = refresh_token else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    match jwt::JwtUtils::refresh_access_token(&refresh_token) {
        Ok(new_access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token: new_access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::info!("Refresh token failed: {}", e);

            // 清除无效的 refresh token cookie
            let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();
            Ok(HttpResponse::Unauthorized().cookie(empty_cookie).json(
                ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    "Login expired or invalid, please login again",
                ),
            ))
        }
    }
}

pub async fn handle_logout(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let claims = bearer_token(request.headers())
        .and_then(|token| jwt::JwtUtils::verify_access_token(token).ok());
    if let Some(claims) = claims {
        invalidate_cached_user(&app_cache(request)?, &claims.sub).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out successfully")))
}
