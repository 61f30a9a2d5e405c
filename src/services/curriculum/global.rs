use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CurriculumService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    curriculum::{
        entities::{ContentType, CurriculumLevel},
        requests::{CreateGlobalItemRequest, GlobalItemListParams, UpdateGlobalItemRequest},
    },
};
use crate::services::current_user;

fn validate_content_type(
    level: CurriculumLevel,
    content_type: Option<ContentType>,
    errors: &mut ValidationErrors,
) {
    if content_type.is_some() && level != CurriculumLevel::MicroLesson {
        errors.add(
            "content_type",
            "Content type can only be set on micro-lessons",
        );
    }
}

pub async fn create_global_item(
    service: &CurriculumService,
    level: CurriculumLevel,
    req: CreateGlobalItemRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    let mut errors = ValidationErrors::new();
    errors.ensure(!req.name.trim().is_empty(), "name", "Name is required");
    validate_content_type(level, req.content_type, &mut errors);
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    let item = storage.create_global_item(level, req).await?;
    info!("Global {} {} created by {}", level, item.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        item,
        "Global curriculum item created successfully",
    )))
}

pub async fn list_global_items(
    service: &CurriculumService,
    level: CurriculumLevel,
    params: GlobalItemListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let items = storage.list_global_items(level, params).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Global curriculum items retrieved successfully",
    )))
}

pub async fn get_global_item(
    service: &CurriculumService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_global_item(&id).await? {
        Some(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            item,
            "Global curriculum item retrieved successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Global curriculum item not found",
        ))),
    }
}

pub async fn update_global_item(
    service: &CurriculumService,
    id: String,
    update: UpdateGlobalItemRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(existing) = storage.get_global_item(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Global curriculum item not found",
        )));
    };

    let mut errors = ValidationErrors::new();
    if let Some(name) = &update.name {
        errors.ensure(!name.trim().is_empty(), "name", "Name cannot be empty");
    }
    validate_content_type(existing.level, update.content_type, &mut errors);
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    match storage.update_global_item(&id, update).await? {
        Some(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            item,
            "Global curriculum item updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Global curriculum item not found",
        ))),
    }
}

pub async fn delete_global_item(
    service: &CurriculumService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.delete_global_item(&id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Global curriculum item deleted successfully",
        )))
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Global curriculum item not found",
        )))
    }
}
