use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MembershipService;
use crate::middlewares::require_jwt::invalidate_cached_user;
use crate::models::{ApiResponse, ErrorCode, memberships::requests::CreateParentChildRequest};
use crate::services::{app_cache, current_user};

pub async fn create_parent_child(
    service: &MembershipService,
    req: CreateParentChildRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if req.child_id == user.id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "You cannot link yourself as a child",
        )));
    }

    match storage.get_user_by_id(&req.child_id).await? {
        Some(child) if child.is_student => {}
        Some(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "The child must be a student",
            )));
        }
        None => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Child user not found",
            )));
        }
    }

    let link = storage.create_parent_child(&user.id, &req.child_id).await?;
    invalidate_cached_user(&app_cache(request)?, &user.id).await;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        link,
        "Parent-child link created successfully",
    )))
}

pub async fn list_parent_child(
    service: &MembershipService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let children = storage.list_children(&user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        children,
        "Parent-child links retrieved successfully",
    )))
}
