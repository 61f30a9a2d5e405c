use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    attendance::{
        entities::Attendance,
        requests::{AttendanceFilter, AttendanceStatsParams},
        responses::AttendanceStatistics,
    },
};
use crate::services::{access, current_user};
use crate::utils::dates::{format_date, parse_date};

/// 按学生汇总出勤情况，按学生 id 排序
pub(crate) fn summarize(records: &[Attendance]) -> Vec<AttendanceStatistics> {
    let mut by_student: BTreeMap<&str, AttendanceStatistics> = BTreeMap::new();
    for record in records {
        by_student
            .entry(record.student_id.as_str())
            .or_insert_with(|| AttendanceStatistics {
                student_id: record.student_id.clone(),
                ..Default::default()
            })
            .record(record.status);
    }
    by_student.into_values().collect()
}

pub async fn statistics(
    service: &AttendanceService,
    params: AttendanceStatsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut errors = ValidationErrors::new();
    let start = parse_date(&params.start_date);
    let end = parse_date(&params.end_date);
    errors.ensure(start.is_ok(), "start_date", "Start date must be in YYYY-MM-DD format");
    errors.ensure(end.is_ok(), "end_date", "End date must be in YYYY-MM-DD format");
    if let (Ok(start), Ok(end)) = (&start, &end) {
        errors.ensure(start <= end, "end_date", "End date must not be before start date");
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }
    let (Ok(start), Ok(end)) = (start, end) else {
        return Ok(ValidationErrors::single("start_date", "Invalid date range").into_response());
    };

    let mut filter = AttendanceFilter {
        section_id: params.section_id,
        subject_id: params.subject_id,
        date_from: Some(format_date(start)),
        date_to: Some(format_date(end)),
        ..Default::default()
    };
    if user.is_teacher {
        let enrollments = access::teacher_enrollments(&storage, &user.id, None).await?;
        filter.section_subject_pairs = Some(access::section_subject_pairs(&enrollments));
    } else if user.is_student {
        filter.student_ids = Some(vec![user.id.clone()]);
    } else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only teachers and students can view attendance statistics",
        )));
    }

    let records = storage.list_all_attendance(filter).await?;
    let mut stats = summarize(&records);

    let ids: Vec<String> = stats.iter().map(|s| s.student_id.clone()).collect();
    let names: BTreeMap<String, String> = storage
        .get_users_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u.display_name()))
        .collect();
    for entry in &mut stats {
        if let Some(name) = names.get(&entry.student_id) {
            entry.student_name = name.clone();
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        stats,
        "Attendance statistics retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;

    fn record(student: &str, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: format!("{student}-{status}"),
            institution_id: "inst".to_string(),
            student_id: student.to_string(),
            section_id: "sec".to_string(),
            subject_id: "math".to_string(),
            date: "2025-03-01".to_string(),
            status,
            created_by: "teacher".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_summarize_groups_by_student() {
        let records = vec![
            record("s2", AttendanceStatus::Absent),
            record("s1", AttendanceStatus::Present),
            record("s1", AttendanceStatus::Late),
            record("s2", AttendanceStatus::Excused),
            record("s1", AttendanceStatus::Present),
        ];
        let stats = summarize(&records);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].student_id, "s1");
        assert_eq!(stats[0].present, 2);
        assert_eq!(stats[0].late, 1);
        assert_eq!(stats[0].total, 3);
        assert_eq!(stats[1].absent, 1);
        assert_eq!(stats[1].excused, 1);
    }
}
