use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{HomeworkService, learner_section_ids, load_homework, teaches_homework};
use crate::errors::TutoriaError;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    homeworks::requests::{
        CreateHomeworkRequest, HomeworkFilter, HomeworkListParams, UpdateHomeworkRequest,
    },
};
use crate::services::{access, current_user};
use crate::utils::dates::parse_date;

pub async fn create_homework(
    service: &HomeworkService,
    req: CreateHomeworkRequest,
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

    if let Err(resp) = req.validate().finish() {
        return Ok(resp);
    }
    match access::validate_track_section_subject(
        &storage,
        &req.institution_id,
        &req.track_id,
        &req.section_id,
        &req.subject_id,
    )
    .await
    {
        Ok(()) => {}
        Err(TutoriaError::Validation(msg)) => {
            return Ok(ValidationErrors::single("section_id", msg).into_response());
        }
        Err(e) => return Err(e.into()),
    }

    let homework = storage.create_homework(&user.id, req).await?;
    info!("Homework {} created by {}", homework.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        homework,
        "Homework created successfully",
    )))
}

pub async fn list_homeworks(
    service: &HomeworkService,
    params: HomeworkListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut filter = HomeworkFilter {
        section_id: params.section_id,
        subject_id: params.subject_id,
        ..Default::default()
    };
    if user.is_teacher {
        let enrollments = access::teacher_enrollments(&storage, &user.id, None).await?;
        filter.section_subject_pairs = Some(access::section_subject_pairs(&enrollments));
    } else {
        // 学生与家长只看有效作业
        filter.section_ids = Some(learner_section_ids(&storage, &user).await?);
        filter.only_active = true;
    }

    let homeworks = storage.list_homeworks(filter, params.pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        homeworks,
        "Homeworks retrieved successfully",
    )))
}

pub async fn get_homework(
    service: &HomeworkService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let homework = match load_homework(&storage, &id).await? {
        Ok(homework) => homework,
        Err(resp) => return Ok(resp),
    };

    let visible = homework.created_by == user.id
        || teaches_homework(&storage, &user, &homework).await?
        || (homework.is_active
            && learner_section_ids(&storage, &user)
                .await?
                .contains(&homework.section_id));
    if !visible {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this homework",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        homework,
        "Homework retrieved successfully",
    )))
}

pub async fn update_homework(
    service: &HomeworkService,
    id: String,
    update: UpdateHomeworkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let homework = match load_homework(&storage, &id).await? {
        Ok(homework) => homework,
        Err(resp) => return Ok(resp),
    };
    if homework.created_by != user.id || !teaches_homework(&storage, &user, &homework).await? {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the assigning teacher can modify this homework",
        )));
    }

    let mut errors = ValidationErrors::new();
    if let Some(title) = &update.title {
        errors.ensure(!title.trim().is_empty(), "title", "Title is required");
    }
    if let Some(due_date) = &update.due_date {
        errors.ensure(
            parse_date(due_date).is_ok(),
            "due_date",
            "Due date must be in YYYY-MM-DD format",
        );
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    match storage.update_homework(&id, update).await? {
        Some(homework) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            homework,
            "Homework updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Homework not found",
        ))),
    }
}

pub async fn delete_homework(
    service: &HomeworkService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let homework = match load_homework(&storage, &id).await? {
        Ok(homework) => homework,
        Err(resp) => return Ok(resp),
    };
    if homework.created_by != user.id || !teaches_homework(&storage, &user, &homework).await? {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the assigning teacher can delete this homework",
        )));
    }

    storage.delete_homework(&id).await?;
    info!("Homework {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Homework deleted successfully",
    )))
}
