use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    ResultService,
    collect::{ResultScope, load_results},
};
use crate::errors::TutoriaError;
use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::entities::CurriculumLevel,
    results::{
        requests::{SectionResultsParams, StudentResultsParams},
        responses::SectionResultsResponse,
    },
};
use crate::services::{access, current_user};

pub async fn student_results(
    service: &ResultService,
    student_id: String,
    params: StudentResultsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 本人、家长、或通过分组授课的教师
    let allowed = if user.id == student_id {
        true
    } else if user.is_parents
        && storage
            .get_parent_child(&user.id, &student_id)
            .await?
            .is_some()
    {
        true
    } else if user.is_teacher {
        let enrollments =
            access::teacher_enrollments(&storage, &user.id, Some(&params.institution_id)).await?;
        access::taught_student_ids(&storage, &enrollments)
            .await?
            .contains(&student_id)
    } else {
        false
    };
    if !allowed {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this student's results",
        )));
    }

    let Some(student) = storage.get_user_by_id(&student_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Student not found",
        )));
    };

    let mut results = load_results(
        &storage,
        &params.institution_id,
        vec![(student.id.clone(), student.display_name())],
        &ResultScope::default(),
    )
    .await?;
    let Some(result) = results.pop() else {
        return Err(TutoriaError::internal_server("Results could not be assembled").into());
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        result,
        "Student results retrieved successfully",
    )))
}

pub async fn section_results(
    service: &ResultService,
    params: SectionResultsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match &params.subject_id {
        Some(subject_id) => {
            access::ensure_teaches(
                &storage,
                &user,
                &params.institution_id,
                &params.section_id,
                subject_id,
            )
            .await?
        }
        None => {
            access::ensure_teaches_section(
                &storage,
                &user,
                &params.institution_id,
                &params.section_id,
            )
            .await?;
        }
    }

    let checked = async {
        let section =
            access::section_in_institution(&storage, &params.section_id, &params.institution_id)
                .await?;
        if let Some(subject_id) = &params.subject_id {
            let subject = access::node_in_institution(
                &storage,
                subject_id,
                &params.institution_id,
                CurriculumLevel::Subject,
            )
            .await?;
            if subject.track_id != section.track_id {
                return Err(TutoriaError::validation(
                    "Subject does not belong to the section's track",
                ));
            }
        }
        Ok::<_, TutoriaError>(section)
    }
    .await;
    if let Err(e) = checked {
        return match e {
            TutoriaError::Validation(msg) => Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))),
            other => Err(other.into()),
        };
    }

    let mut students: Vec<(String, String)> = storage
        .list_section_students(&params.section_id)
        .await?
        .into_iter()
        .map(|s| (s.student.id.clone(), s.student.display_name()))
        .collect();
    if let Some(student_id) = &params.student_id {
        students.retain(|(id, _)| id == student_id);
        if students.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Student is not enrolled in this section",
            )));
        }
    }

    let scope = ResultScope {
        section_id: Some(&params.section_id),
        subject_id: params.subject_id.as_deref(),
    };
    let results = load_results(&storage, &params.institution_id, students, &scope).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SectionResultsResponse {
            section_id: params.section_id.clone(),
            subject_id: params.subject_id.clone(),
            students: results,
        },
        "Section results retrieved successfully",
    )))
}
