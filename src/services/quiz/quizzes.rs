use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuizService, load_quiz};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, ValidationErrors,
    curriculum::entities::{CurriculumLevel, CurriculumNode},
    memberships::entities::MembershipRole,
    quiz::{
        entities::{Quiz, QuizQuestion},
        requests::{
            CreateQuizRequest, NewQuiz, QuizListParams, UpdateQuizRequest,
            validate_negative_marking,
        },
        responses::QuizQuestionsResponse,
    },
    users::entities::User,
};
use crate::services::{access, current_user};
use crate::storage::Storage;

/// 校验失败记入 errors，其余错误继续向上抛
fn collect<T>(result: Result<T>, field: &str, errors: &mut ValidationErrors) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(TutoriaError::Validation(msg)) => {
            errors.add(field, msg);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// 上级链：节点的 parent 必须是给定的上级
fn check_parent(
    node: Option<&CurriculumNode>,
    parent: Option<&CurriculumNode>,
    field: &str,
    errors: &mut ValidationErrors,
) {
    if let (Some(node), Some(parent)) = (node, parent)
        && node.parent_id.as_deref() != Some(parent.id.as_str())
    {
        errors.add(
            field,
            format!("{} does not belong to the given {}", node.level, parent.level),
        );
    }
}

async fn node(
    storage: &Arc<dyn Storage>,
    id: Option<&String>,
    institution_id: &str,
    level: CurriculumLevel,
    field: &str,
    errors: &mut ValidationErrors,
) -> Result<Option<CurriculumNode>> {
    let Some(id) = id else { return Ok(None) };
    let found = access::node_in_institution(storage, id, institution_id, level).await;
    collect(found, field, errors)
}

/// 测验挂载位置的一致性
async fn validate_placement(
    storage: &Arc<dyn Storage>,
    req: &CreateQuizRequest,
    errors: &mut ValidationErrors,
) -> Result<()> {
    let inst = req.institution_id.as_str();
    let track = node(
        storage,
        Some(&req.track_id),
        inst,
        CurriculumLevel::Track,
        "track_id",
        errors,
    )
    .await?;
    let Some(track) = track else { return Ok(()) };

    let section = match &req.section_id {
        Some(section_id) => collect(
            access::section_in_institution(storage, section_id, inst).await,
            "section_id",
            errors,
        )?,
        None => None,
    };
    if let Some(section) = &section {
        errors.ensure(
            section.track_id == track.id,
            "section_id",
            "Section does not belong to the track",
        );
    }

    let stream = node(
        storage,
        req.stream_id.as_ref(),
        inst,
        CurriculumLevel::Stream,
        "stream_id",
        errors,
    )
    .await?;
    if let Some(stream) = &stream {
        errors.ensure(
            stream.track_id == track.id,
            "stream_id",
            "Stream does not belong to the track",
        );
        if let (Some(section), Some(bound)) = (&section, &stream.section_id) {
            errors.ensure(
                *bound == section.id,
                "stream_id",
                "Stream is bound to a different section",
            );
        }
    }

    let subject = node(
        storage,
        Some(&req.subject_id),
        inst,
        CurriculumLevel::Subject,
        "subject_id",
        errors,
    )
    .await?;
    if let Some(subject) = &subject {
        errors.ensure(
            subject.track_id == track.id,
            "subject_id",
            "Subject does not belong to the track",
        );
    }
    check_parent(subject.as_ref(), stream.as_ref(), "subject_id", errors);

    let module = node(
        storage,
        req.module_id.as_ref(),
        inst,
        CurriculumLevel::Module,
        "module_id",
        errors,
    )
    .await?;
    check_parent(module.as_ref(), subject.as_ref(), "module_id", errors);
    let unit = node(
        storage,
        req.unit_id.as_ref(),
        inst,
        CurriculumLevel::Unit,
        "unit_id",
        errors,
    )
    .await?;
    check_parent(unit.as_ref(), module.as_ref(), "unit_id", errors);
    let lesson = node(
        storage,
        req.lesson_id.as_ref(),
        inst,
        CurriculumLevel::Lesson,
        "lesson_id",
        errors,
    )
    .await?;
    check_parent(lesson.as_ref(), unit.as_ref(), "lesson_id", errors);
    let micro = node(
        storage,
        req.micro_lesson_id.as_ref(),
        inst,
        CurriculumLevel::MicroLesson,
        "micro_lesson_id",
        errors,
    )
    .await?;
    check_parent(micro.as_ref(), lesson.as_ref(), "micro_lesson_id", errors);
    Ok(())
}

/// 所有题目都存在
async fn validate_question_ids(
    storage: &Arc<dyn Storage>,
    ids: &[String],
    errors: &mut ValidationErrors,
) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: HashSet<String> = storage
        .get_questions_by_ids(ids)
        .await?
        .into_iter()
        .map(|q| q.id)
        .collect();
    for id in ids.iter().filter(|id| !found.contains(*id)) {
        errors.add("question_ids", format!("Question {id} not found"));
    }
    Ok(())
}

async fn load_owned(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: &str,
) -> Result<std::result::Result<Quiz, HttpResponse>> {
    let quiz = match load_quiz(storage, id).await? {
        Ok(quiz) => quiz,
        Err(resp) => return Ok(Err(resp)),
    };
    if quiz.created_by != user.id {
        return Ok(Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the quiz creator can access this quiz",
        ))));
    }
    Ok(Ok(quiz))
}

pub async fn create_quiz(
    service: &QuizService,
    req: CreateQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::require_membership(
        &storage,
        &user.id,
        &req.institution_id,
        MembershipRole::Teacher,
    )
    .await?;

    let mut errors = req.validate();
    validate_placement(&storage, &req, &mut errors).await?;
    validate_question_ids(&storage, &req.question_ids, &mut errors).await?;
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    let quiz = storage
        .create_quiz(NewQuiz {
            request: req,
            created_by: user.id.clone(),
        })
        .await?;
    info!("Quiz {} created by {}", quiz.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        quiz,
        "Quiz created successfully",
    )))
}

pub async fn list_quizzes(
    service: &QuizService,
    params: QuizListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let quizzes = if user.is_teacher {
        storage.list_quizzes_by_creator(&user.id, params).await?
    } else if user.is_student {
        let track_ids: Vec<String> = access::student_enrollments(&storage, &user.id, None)
            .await?
            .into_iter()
            .map(|e| e.track_id)
            .collect();
        storage.list_available_quizzes(&track_ids, params).await?
    } else {
        let (page, size) = params.pagination.normalized();
        PaginatedResponse::new(vec![], PaginationInfo::new(page, size, 0))
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        quizzes,
        "Quizzes retrieved successfully",
    )))
}

pub async fn get_quiz(
    service: &QuizService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match load_owned(&storage, &user, &id).await? {
        Ok(quiz) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            quiz,
            "Quiz retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn update_quiz(
    service: &QuizService,
    id: String,
    update: UpdateQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let quiz = match load_owned(&storage, &user, &id).await? {
        Ok(quiz) => quiz,
        Err(resp) => return Ok(resp),
    };

    let mut errors = ValidationErrors::new();
    if let Some(title) = &update.title {
        errors.ensure(!title.trim().is_empty(), "title", "Title is required");
    }
    // 与现有值合并后再校验
    let enabled = update
        .enable_negative_marking
        .unwrap_or(quiz.enable_negative_marking);
    let negative = match (update.enable_negative_marking, update.negative_marks) {
        (_, Some(marks)) => Some(marks),
        (Some(false), None) => None,
        _ => quiz.negative_marks,
    };
    validate_negative_marking(enabled, negative, &mut errors);
    if let (Some(start), Some(end)) = (
        update.start_time.or(quiz.start_time),
        update.end_time.or(quiz.end_time),
    ) {
        errors.ensure(start < end, "end_time", "End time must be after start time");
    }
    if let Some(timer) = update.timer_per_question {
        errors.ensure(
            timer > 0,
            "timer_per_question",
            "Timer must be a positive number of seconds",
        );
    }
    if let Some(ids) = &update.question_ids {
        errors.ensure(
            !ids.is_empty(),
            "question_ids",
            "At least one question is required",
        );
        let unique: HashSet<_> = ids.iter().collect();
        errors.ensure(
            unique.len() == ids.len(),
            "question_ids",
            "Duplicate questions are not allowed",
        );
        validate_question_ids(&storage, ids, &mut errors).await?;
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    match storage.update_quiz(&id, update).await? {
        Some(quiz) => {
            info!("Quiz {} updated by {}", id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                quiz,
                "Quiz updated successfully",
            )))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Quiz not found",
        ))),
    }
}

pub async fn delete_quiz(
    service: &QuizService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_owned(&storage, &user, &id).await? {
        return Ok(resp);
    }

    storage.delete_quiz(&id).await?;
    info!("Quiz {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Quiz deleted successfully",
    )))
}

/// 按测验中的顺序排列题目
fn ordered_questions(quiz: &Quiz, questions: Vec<QuizQuestion>) -> Vec<QuizQuestion> {
    let mut by_id: std::collections::HashMap<String, QuizQuestion> =
        questions.into_iter().map(|q| (q.id.clone(), q)).collect();
    quiz.question_ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect()
}

pub async fn quiz_questions(
    service: &QuizService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let quiz = match load_quiz(&storage, &id).await? {
        Ok(quiz) => quiz,
        Err(resp) => return Ok(resp),
    };

    let is_creator = quiz.created_by == user.id;
    if !is_creator {
        let enrolled =
            access::student_enrollments(&storage, &user.id, Some(&quiz.institution_id))
                .await?
                .iter()
                .any(|e| e.track_id == quiz.track_id);
        if !enrolled {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You are not enrolled in this quiz's track",
            )));
        }
    }

    let questions = storage.get_questions_by_ids(&quiz.question_ids).await?;
    let mut questions = ordered_questions(&quiz, questions);
    if !is_creator {
        questions = questions.into_iter().map(QuizQuestion::redacted).collect();
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizQuestionsResponse {
            quiz_id: quiz.id,
            questions,
        },
        "Quiz questions retrieved successfully",
    )))
}
