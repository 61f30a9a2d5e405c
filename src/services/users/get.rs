use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode, auth::responses::UserInfoResponse};

pub async fn get_user(
    service: &UserService,
    user_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(&user_id).await? {
        Some(user) => {
            let roles = user.roles();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserInfoResponse { user, roles },
                "User retrieved successfully",
            )))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
    }
}
