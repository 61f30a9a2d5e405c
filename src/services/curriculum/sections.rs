use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CurriculumService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    curriculum::{
        entities::CurriculumLevel,
        requests::{CreateSectionRequest, SectionListParams, UpdateSectionRequest},
    },
};
use crate::services::{access, current_user};

pub async fn create_section(
    service: &CurriculumService,
    req: CreateSectionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &req.institution_id).await?;

    if req.name.trim().is_empty() {
        return Ok(ValidationErrors::single("name", "Name is required").into_response());
    }
    access::node_in_institution(
        &storage,
        &req.track_id,
        &req.institution_id,
        CurriculumLevel::Track,
    )
    .await?;

    let section = storage.create_section(req).await?;
    info!("Section {} created by {}", section.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        section,
        "Section created successfully",
    )))
}

pub async fn list_sections(
    service: &CurriculumService,
    params: SectionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let Some(institution_id) = params.institution_id else {
        return Ok(
            ValidationErrors::single("institution_id", "institution_id is required")
                .into_response(),
        );
    };

    let storage = service.get_storage(request)?;
    access::ensure_institution_member(&storage, &user, &institution_id).await?;

    let sections = storage
        .list_sections(&institution_id, params.track_id.as_deref(), params.pagination)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        sections,
        "Sections retrieved successfully",
    )))
}

pub async fn get_section(
    service: &CurriculumService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(section) = storage.get_section(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Section not found",
        )));
    };
    access::ensure_institution_member(&storage, &user, &section.institution_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        section,
        "Section retrieved successfully",
    )))
}

pub async fn update_section(
    service: &CurriculumService,
    id: String,
    update: UpdateSectionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(section) = storage.get_section(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Section not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &section.institution_id).await?;

    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Ok(ValidationErrors::single("name", "Name cannot be empty").into_response());
    }

    match storage.update_section(&id, update).await? {
        Some(section) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            section,
            "Section updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Section not found",
        ))),
    }
}

pub async fn delete_section(
    service: &CurriculumService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(section) = storage.get_section(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Section not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &section.institution_id).await?;

    storage.delete_section(&id).await?;
    info!("Section {} deleted by {}", section.id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Section deleted successfully",
    )))
}
