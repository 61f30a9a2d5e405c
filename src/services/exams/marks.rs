use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, load_exam, teaches_exam};
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    exams::requests::{
        CreateExamMarkRequest, ExamMarkListParams, UpdateExamMarkRequest,
        validate_marks_obtained,
    },
};
use crate::services::{access, current_user, homeworks::child_ids};

pub async fn create_mark(
    service: &ExamService,
    req: CreateExamMarkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let exam = match load_exam(&storage, &req.exam_id).await? {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };
    if !teaches_exam(&storage, &user, &exam).await? {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You are not enrolled to teach this section and subject",
        )));
    }

    let mut errors = ValidationErrors::new();
    validate_marks_obtained(req.marks_obtained, exam.total_marks, &mut errors);
    let enrolled = access::student_enrollments(&storage, &req.student_id, Some(&exam.institution_id))
        .await?
        .iter()
        .any(|e| e.track_id == exam.track_id && e.section_id == exam.section_id);
    errors.ensure(
        enrolled,
        "student_id",
        "Student is not enrolled in this exam's track and section",
    );
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    if storage
        .find_exam_mark(&exam.id, &req.student_id)
        .await?
        .is_some()
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Marks already recorded for this student",
        )));
    }

    let mark = storage.create_exam_mark(&user.id, req).await?;
    info!(
        "Exam mark {} recorded for student {} by {}",
        mark.id, mark.student_id, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        mark,
        "Exam mark recorded successfully",
    )))
}

/// 教师按考试查看全部成绩，学生看自己，家长看子女
pub async fn list_marks(
    service: &ExamService,
    params: ExamMarkListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Some(exam_id) = &params.exam_id {
        let exam = match load_exam(&storage, exam_id).await? {
            Ok(exam) => exam,
            Err(resp) => return Ok(resp),
        };
        if teaches_exam(&storage, &user, &exam).await? {
            let marks = storage.list_exam_marks(Some(&exam.id), None).await?;
            return Ok(HttpResponse::Ok().json(ApiResponse::success(
                marks,
                "Exam marks retrieved successfully",
            )));
        }
    }

    let mut learners = child_ids(&storage, &user).await?;
    if user.is_student {
        learners.push(user.id.clone());
    }
    if learners.is_empty() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view these marks",
        )));
    }

    let marks = storage
        .list_exam_marks(params.exam_id.as_deref(), Some(learners))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        marks,
        "Exam marks retrieved successfully",
    )))
}

pub async fn update_mark(
    service: &ExamService,
    id: String,
    update: UpdateExamMarkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(mark) = storage.get_exam_mark(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Exam mark not found",
        )));
    };
    let exam = match load_exam(&storage, &mark.exam_id).await? {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };
    if mark.created_by != user.id && exam.created_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the creator can modify this mark",
        )));
    }

    if let Some(marks) = update.marks_obtained {
        let mut errors = ValidationErrors::new();
        validate_marks_obtained(marks, exam.total_marks, &mut errors);
        if let Err(resp) = errors.finish() {
            return Ok(resp);
        }
    }

    match storage.update_exam_mark(&id, update).await? {
        Some(mark) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            mark,
            "Exam mark updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Exam mark not found",
        ))),
    }
}

pub async fn delete_mark(
    service: &ExamService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(mark) = storage.get_exam_mark(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Exam mark not found",
        )));
    };
    let exam = match load_exam(&storage, &mark.exam_id).await? {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };
    if mark.created_by != user.id && exam.created_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the creator can delete this mark",
        )));
    }

    storage.delete_exam_mark(&id).await?;
    info!("Exam mark {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Exam mark deleted successfully",
    )))
}
