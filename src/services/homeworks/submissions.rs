use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{HomeworkService, child_ids, load_homework, teaches_homework};
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    homeworks::requests::{MarkSubmissionRequest, SubmissionListParams},
};
use crate::services::{access, current_user};
use crate::utils::dates::{format_date, parse_date};

pub async fn mark_submission(
    service: &HomeworkService,
    id: String,
    mut req: MarkSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let homework = match load_homework(&storage, &id).await? {
        Ok(homework) => homework,
        Err(resp) => return Ok(resp),
    };
    if !teaches_homework(&storage, &user, &homework).await? {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You are not enrolled to teach this section and subject",
        )));
    }

    let mut errors = ValidationErrors::new();
    errors.ensure(
        access::is_enrolled_in_section(&storage, &req.student_id, &homework.section_id).await?,
        "student_id",
        "Student is not enrolled in this section",
    );
    if let Some(date) = &req.submission_date {
        match parse_date(date) {
            Ok(parsed) => req.submission_date = Some(format_date(parsed)),
            Err(_) => errors.add(
                "submission_date",
                "Submission date must be in YYYY-MM-DD format",
            ),
        }
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    let submission = storage.upsert_submission(&homework.id, &user.id, req).await?;
    info!(
        "Homework {} marked {} for student {} by {}",
        homework.id,
        if submission.submitted { "submitted" } else { "not submitted" },
        submission.student_id,
        user.id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission status updated successfully",
    )))
}

pub async fn list_submissions(
    service: &HomeworkService,
    id: String,
    params: SubmissionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let homework = match load_homework(&storage, &id).await? {
        Ok(homework) => homework,
        Err(resp) => return Ok(resp),
    };

    // 教师看全部，学生看自己，家长看子女
    let mut student_ids = if teaches_homework(&storage, &user, &homework).await? {
        None
    } else {
        let mut ids = child_ids(&storage, &user).await?;
        if user.is_student {
            ids.push(user.id.clone());
        }
        if ids.is_empty() {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You do not have permission to view these submissions",
            )));
        }
        Some(ids)
    };
    if let Some(student_id) = params.student_id {
        student_ids = match student_ids {
            None => Some(vec![student_id]),
            Some(ids) => Some(ids.into_iter().filter(|id| *id == student_id).collect()),
        };
    }

    let submissions = storage.list_submissions(&homework.id, student_ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submissions,
        "Submissions retrieved successfully",
    )))
}
