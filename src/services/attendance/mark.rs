use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::AttendanceService;
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        requests::{BulkAttendanceRequest, CreateAttendanceRequest, NewAttendance},
        responses::BulkAttendanceResponse,
    },
    curriculum::entities::CurriculumLevel,
};
use crate::services::{access, current_user};
use crate::storage::Storage;
use crate::utils::dates::{format_date, parse_date, today};

/// 考勤日期不能晚于今天，返回规范化后的日期
pub(crate) fn check_date(date: &str, today: NaiveDate) -> Result<String> {
    let parsed = parse_date(date)
        .map_err(|_| TutoriaError::validation("Date must be in YYYY-MM-DD format"))?;
    if parsed > today {
        return Err(TutoriaError::validation(
            "Attendance cannot be recorded for a future date",
        ));
    }
    Ok(format_date(parsed))
}

/// 重复的学生 id
fn duplicated_ids(student_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    student_ids
        .iter()
        .filter(|id| !seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// 校验分组、科目、学生与日期，返回规范化日期
pub(crate) async fn validate_marking(
    storage: &Arc<dyn Storage>,
    institution_id: &str,
    section_id: &str,
    subject_id: &str,
    date: &str,
    student_ids: &[String],
) -> Result<String> {
    let date = check_date(date, today())?;
    if student_ids.is_empty() {
        return Err(TutoriaError::validation("No attendance entries provided"));
    }
    if let Some(id) = duplicated_ids(student_ids).first() {
        return Err(TutoriaError::validation(format!(
            "Student {id} appears more than once"
        )));
    }

    let section = access::section_in_institution(storage, section_id, institution_id).await?;
    let subject =
        access::node_in_institution(storage, subject_id, institution_id, CurriculumLevel::Subject)
            .await?;
    access::ensure_subject_in_section(&subject, &section)?;

    let enrolled: HashSet<String> = storage
        .list_section_students(section_id)
        .await?
        .into_iter()
        .map(|s| s.student.id)
        .collect();
    if let Some(missing) = student_ids.iter().find(|id| !enrolled.contains(*id)) {
        return Err(TutoriaError::validation(format!(
            "Student {missing} is not enrolled in this section"
        )));
    }

    let marked = storage
        .find_marked_students(section_id, subject_id, &date, student_ids)
        .await?;
    if !marked.is_empty() {
        return Err(TutoriaError::conflict(format!(
            "Attendance already recorded for: {}",
            marked.join(", ")
        )));
    }
    Ok(date)
}

fn rejection(err: TutoriaError) -> HttpResponse {
    match err {
        TutoriaError::Conflict(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg))
        }
        other => HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AttendanceInvalid,
            other.message(),
        )),
    }
}

pub async fn create_attendance(
    service: &AttendanceService,
    req: CreateAttendanceRequest,
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

    let student_ids = vec![req.student_id.clone()];
    let date = match validate_marking(
        &storage,
        &req.institution_id,
        &req.section_id,
        &req.subject_id,
        &req.date,
        &student_ids,
    )
    .await
    {
        Ok(date) => date,
        Err(e) => return Ok(rejection(e)),
    };

    let attendance = storage
        .create_attendance(NewAttendance {
            institution_id: req.institution_id,
            student_id: req.student_id,
            section_id: req.section_id,
            subject_id: req.subject_id,
            date,
            status: req.status,
            created_by: user.id.clone(),
        })
        .await?;
    info!("Attendance {} recorded by {}", attendance.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        attendance,
        "Attendance recorded successfully",
    )))
}

pub async fn bulk_create_attendance(
    service: &AttendanceService,
    req: BulkAttendanceRequest,
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

    let student_ids: Vec<String> = req
        .attendances
        .iter()
        .map(|a| a.student_id.clone())
        .collect();
    let date = match validate_marking(
        &storage,
        &req.institution_id,
        &req.section_id,
        &req.subject_id,
        &req.date,
        &student_ids,
    )
    .await
    {
        Ok(date) => date,
        Err(e) => return Ok(rejection(e)),
    };

    let rows = req
        .attendances
        .into_iter()
        .map(|entry| NewAttendance {
            institution_id: req.institution_id.clone(),
            student_id: entry.student_id,
            section_id: req.section_id.clone(),
            subject_id: req.subject_id.clone(),
            date: date.clone(),
            status: entry.status,
            created_by: user.id.clone(),
        })
        .collect();

    let items = storage.bulk_create_attendance(rows).await?;
    info!(
        "{} attendance rows recorded for section {} on {} by {}",
        items.len(),
        req.section_id,
        date,
        user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        BulkAttendanceResponse {
            created: items.len(),
            items,
        },
        "Attendance recorded successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_date_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(check_date("2025-03-10", today).unwrap(), "2025-03-10");
        assert_eq!(check_date(" 2025-03-01 ", today).unwrap(), "2025-03-01");
        assert!(check_date("2025-03-11", today).is_err());
        assert!(check_date("10/03/2025", today).is_err());
    }

    #[test]
    fn test_duplicated_ids() {
        let ids = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(duplicated_ids(&ids), vec!["a".to_string()]);
        assert!(duplicated_ids(&ids[..2]).is_empty());
    }
}
