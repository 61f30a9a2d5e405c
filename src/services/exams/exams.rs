use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, load_exam, teaches_exam};
use crate::errors::TutoriaError;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    exams::requests::{
        CreateExamRequest, ExamFilter, ExamListParams, UpdateExamRequest, validate_exam_date,
    },
};
use crate::services::{access, current_user, homeworks::learner_section_ids};

pub async fn create_exam(
    service: &ExamService,
    req: CreateExamRequest,
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
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ExamInvalid, msg)));
        }
        Err(e) => return Err(e.into()),
    }

    let exam = storage.create_exam(&user.id, req).await?;
    info!("Exam {} created by {}", exam.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        exam,
        "Exam created successfully",
    )))
}

/// 教师看授课分组的考试，学生与家长看在读分组的有效考试
pub async fn list_exams(
    service: &ExamService,
    params: ExamListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut filter = ExamFilter {
        section_id: params.section_id,
        subject_id: params.subject_id,
        ..Default::default()
    };
    if user.is_teacher {
        let enrollments = access::teacher_enrollments(&storage, &user.id, None).await?;
        filter.section_ids = Some(access::taught_section_ids(&enrollments));
    } else {
        filter.section_ids = Some(learner_section_ids(&storage, &user).await?);
        filter.only_active = true;
    }

    let exams = storage.list_exams(filter, params.pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        exams,
        "Exams retrieved successfully",
    )))
}

pub async fn created_exams(
    service: &ExamService,
    params: ExamListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let exams = storage
        .list_exams(
            ExamFilter {
                created_by: Some(user.id.clone()),
                section_id: params.section_id,
                subject_id: params.subject_id,
                ..Default::default()
            },
            params.pagination,
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        exams,
        "Exams retrieved successfully",
    )))
}

pub async fn get_exam(
    service: &ExamService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let exam = match load_exam(&storage, &id).await? {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };
    let visible = teaches_exam(&storage, &user, &exam).await?
        || (exam.is_active
            && learner_section_ids(&storage, &user)
                .await?
                .contains(&exam.section_id));
    if !visible {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this exam",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        exam,
        "Exam retrieved successfully",
    )))
}

pub async fn update_exam(
    service: &ExamService,
    id: String,
    update: UpdateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let exam = match load_exam(&storage, &id).await? {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };
    if exam.created_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the exam creator can modify this exam",
        )));
    }

    let mut errors = ValidationErrors::new();
    if let Some(title) = &update.title {
        errors.ensure(!title.trim().is_empty(), "title", "Title is required");
    }
    if let Some(date) = &update.exam_date {
        validate_exam_date(date, &mut errors);
    }
    if let Some(total) = update.total_marks {
        errors.ensure(
            total.is_finite() && total > 0.0,
            "total_marks",
            "Total marks must be greater than zero",
        );
        // 已录入的成绩不能超过新的总分
        let highest = storage
            .list_exam_marks(Some(&exam.id), None)
            .await?
            .iter()
            .map(|m| m.marks_obtained)
            .fold(0.0_f64, f64::max);
        errors.ensure(
            highest <= total,
            "total_marks",
            format!("Existing marks go up to {highest}"),
        );
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    match storage.update_exam(&id, update).await? {
        Some(exam) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            exam,
            "Exam updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Exam not found",
        ))),
    }
}

pub async fn delete_exam(
    service: &ExamService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let exam = match load_exam(&storage, &id).await? {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };
    if exam.created_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the exam creator can delete this exam",
        )));
    }

    storage.delete_exam(&id).await?;
    info!("Exam {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Exam deleted successfully",
    )))
}
