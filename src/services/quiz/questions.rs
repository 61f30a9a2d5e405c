use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::QuizService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode, PaginatedResponse, ValidationErrors,
    curriculum::entities::CurriculumLevel,
    quiz::{
        entities::QuizQuestion,
        requests::{CreateQuestionRequest, QuestionListParams, UpdateQuestionRequest},
    },
    users::entities::User,
};
use crate::services::{access, current_user};
use crate::storage::Storage;

/// 教师或机构管理员可以出题
pub(crate) async fn can_author(storage: &Arc<dyn Storage>, user: &User) -> Result<bool> {
    if user.is_teacher || user.is_institution || user.is_staff {
        return Ok(true);
    }
    Ok(!access::admin_institution_ids(storage, user).await?.is_empty())
}

/// 题目挂载的全局课程条目必须存在且层级正确
async fn check_global_refs(
    storage: &Arc<dyn Storage>,
    req: &CreateQuestionRequest,
    errors: &mut ValidationErrors,
) -> Result<()> {
    let refs = [
        ("track_id", Some(&req.track_id), CurriculumLevel::Track),
        ("stream_id", Some(&req.stream_id), CurriculumLevel::Stream),
        ("subject_id", Some(&req.subject_id), CurriculumLevel::Subject),
        ("module_id", Some(&req.module_id), CurriculumLevel::Module),
        ("unit_id", Some(&req.unit_id), CurriculumLevel::Unit),
        ("lesson_id", req.lesson_id.as_ref(), CurriculumLevel::Lesson),
        (
            "micro_lesson_id",
            req.micro_lesson_id.as_ref(),
            CurriculumLevel::MicroLesson,
        ),
    ];
    for (field, id, level) in refs {
        let Some(id) = id else { continue };
        match storage.get_global_item(id).await? {
            Some(item) if item.level == level => {}
            Some(_) => errors.add(field, format!("Global item is not a {level}")),
            None => errors.add(field, format!("Global {level} not found")),
        }
    }
    Ok(())
}

async fn load_owned(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: &str,
) -> Result<std::result::Result<QuizQuestion, HttpResponse>> {
    let Some(question) = storage.get_question(id).await? else {
        return Ok(Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Question not found",
        ))));
    };
    if question.created_by != user.id {
        warn!("User {} is not the author of question {}", user.id, id);
        return Ok(Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the author can modify this question",
        ))));
    }
    Ok(Ok(question))
}

pub async fn create_question(
    service: &QuizService,
    req: CreateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if !can_author(&storage, &user).await? {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only teachers and institution admins can create questions",
        )));
    }

    let mut errors = req.validate();
    check_global_refs(&storage, &req, &mut errors).await?;
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    let question = storage.create_question(&user.id, req).await?;
    info!("Question {} created by {}", question.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        question,
        "Question created successfully",
    )))
}

pub async fn list_questions(
    service: &QuizService,
    params: QuestionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let page = storage.list_questions(params).await?;
    let page = if can_author(&storage, &user).await? {
        page
    } else {
        PaginatedResponse::new(
            page.items.into_iter().map(QuizQuestion::redacted).collect(),
            page.pagination,
        )
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        page,
        "Questions retrieved successfully",
    )))
}

pub async fn get_question(
    service: &QuizService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(question) = storage.get_question(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Question not found",
        )));
    };
    let question = if can_author(&storage, &user).await? {
        question
    } else {
        question.redacted()
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        question,
        "Question retrieved successfully",
    )))
}

pub async fn update_question(
    service: &QuizService,
    id: String,
    update: UpdateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let question = match load_owned(&storage, &user, &id).await? {
        Ok(question) => question,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = update.validate(question.question_type).finish() {
        return Ok(resp);
    }

    match storage.update_question(&id, update).await? {
        Some(question) => {
            info!("Question {} updated by {}", id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                question,
                "Question updated successfully",
            )))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Question not found",
        ))),
    }
}

pub async fn delete_question(
    service: &QuizService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_owned(&storage, &user, &id).await? {
        return Ok(resp);
    }

    storage.delete_question(&id).await?;
    info!("Question {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Question deleted successfully",
    )))
}
