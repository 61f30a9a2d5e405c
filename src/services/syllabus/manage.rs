use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SyllabusService;
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    curriculum::entities::CurriculumNode,
    syllabus::{
        entities::Syllabus,
        requests::{
            CreateSyllabusRequest, SyllabusFilter, SyllabusListParams, UpdateSyllabusRequest,
        },
    },
    users::entities::User,
};
use crate::services::{access, current_user, homeworks::learner_section_ids};
use crate::storage::Storage;

/// 沿上级链查找，节点是否位于该科目之下
async fn is_under_subject(
    storage: &Arc<dyn Storage>,
    node: &CurriculumNode,
    subject_id: &str,
) -> Result<bool> {
    let mut parent_id = node.parent_id.clone();
    while let Some(id) = parent_id {
        if id == subject_id {
            return Ok(true);
        }
        match storage.get_node(&id).await? {
            Some(parent) if parent.level.is_below_subject() => parent_id = parent.parent_id,
            _ => return Ok(false),
        }
    }
    Ok(false)
}

/// 大纲引用的节点必须在科目之下且属于同一机构
async fn validate_nodes(
    storage: &Arc<dyn Storage>,
    institution_id: &str,
    subject_id: &str,
    node_ids: &[String],
    errors: &mut ValidationErrors,
) -> Result<()> {
    for id in node_ids {
        let Some(node) = storage.get_node(id).await? else {
            errors.add("node_ids", format!("Node {id} not found"));
            continue;
        };
        if node.institution_id != institution_id
            || !node.level.is_below_subject()
            || !is_under_subject(storage, &node, subject_id).await?
        {
            errors.add(
                "node_ids",
                format!("Node {id} is not part of the syllabus subject"),
            );
        }
    }
    Ok(())
}

async fn load_managed(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: &str,
) -> Result<std::result::Result<Syllabus, HttpResponse>> {
    let Some(syllabus) = storage.get_syllabus(id).await? else {
        return Ok(Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Syllabus not found",
        ))));
    };
    let teaches = access::teacher_enrollments(storage, &user.id, Some(&syllabus.institution_id))
        .await?
        .iter()
        .any(|e| e.covers(&syllabus.section_id, &syllabus.subject_id));
    if !teaches {
        return Ok(Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You are not enrolled to teach this section and subject",
        ))));
    }
    Ok(Ok(syllabus))
}

pub async fn create_syllabus(
    service: &SyllabusService,
    req: CreateSyllabusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_teaches(
        &storage,
        &user,
        &req.institution_id,
        &req.section_id,
        &req.subject_id,
    )
    .await?;

    let mut errors = ValidationErrors::new();
    errors.ensure(!req.title.trim().is_empty(), "title", "Title is required");
    match access::validate_track_section_subject(
        &storage,
        &req.institution_id,
        &req.track_id,
        &req.section_id,
        &req.subject_id,
    )
    .await
    {
        Ok(()) => {
            validate_nodes(
                &storage,
                &req.institution_id,
                &req.subject_id,
                &req.node_ids,
                &mut errors,
            )
            .await?
        }
        Err(TutoriaError::Validation(msg)) => errors.add("subject_id", msg),
        Err(e) => return Err(e.into()),
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    let syllabus = storage.create_syllabus(&user.id, req).await?;
    info!("Syllabus {} created by {}", syllabus.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        syllabus,
        "Syllabus created successfully",
    )))
}

pub async fn list_syllabi(
    service: &SyllabusService,
    params: SyllabusListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut filter = SyllabusFilter {
        section_id: params.section_id,
        subject_id: params.subject_id,
        purpose: params.purpose,
        ..Default::default()
    };
    if user.is_teacher {
        let enrollments = access::teacher_enrollments(&storage, &user.id, None).await?;
        filter.section_ids = Some(access::taught_section_ids(&enrollments));
    } else {
        filter.section_ids = Some(learner_section_ids(&storage, &user).await?);
        filter.only_active = true;
    }

    let syllabi = storage.list_syllabi(filter, params.pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        syllabi,
        "Syllabi retrieved successfully",
    )))
}

pub async fn get_syllabus(
    service: &SyllabusService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(syllabus) = storage.get_syllabus(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Syllabus not found",
        )));
    };
    let visible = syllabus.created_by == user.id
        || access::teacher_enrollments(&storage, &user.id, Some(&syllabus.institution_id))
            .await?
            .iter()
            .any(|e| e.covers_section(&syllabus.section_id))
        || (syllabus.is_active
            && learner_section_ids(&storage, &user)
                .await?
                .contains(&syllabus.section_id));
    if !visible {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this syllabus",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        syllabus,
        "Syllabus retrieved successfully",
    )))
}

pub async fn update_syllabus(
    service: &SyllabusService,
    id: String,
    update: UpdateSyllabusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let syllabus = match load_managed(&storage, &user, &id).await? {
        Ok(syllabus) => syllabus,
        Err(resp) => return Ok(resp),
    };

    let mut errors = ValidationErrors::new();
    if let Some(title) = &update.title {
        errors.ensure(!title.trim().is_empty(), "title", "Title is required");
    }
    if let Some(node_ids) = &update.node_ids {
        validate_nodes(
            &storage,
            &syllabus.institution_id,
            &syllabus.subject_id,
            node_ids,
            &mut errors,
        )
        .await?;
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    match storage.update_syllabus(&id, update).await? {
        Some(syllabus) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            syllabus,
            "Syllabus updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Syllabus not found",
        ))),
    }
}

pub async fn delete_syllabus(
    service: &SyllabusService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed(&storage, &user, &id).await? {
        return Ok(resp);
    }

    storage.delete_syllabus(&id).await?;
    info!("Syllabus {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Syllabus deleted successfully",
    )))
}
