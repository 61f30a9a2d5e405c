use serde::Deserialize;
use ts_rs::TS;

use super::entities::ExamType;
use crate::models::{PaginationQuery, ValidationErrors};
use crate::utils::dates;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateExamRequest {
    pub institution_id: String,
    pub track_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub title: String,
    pub exam_type: ExamType,
    pub exam_date: String,
    pub total_marks: f64,
}

/// 考试日期不能晚于今天
pub fn validate_exam_date(exam_date: &str, errors: &mut ValidationErrors) {
    match dates::parse_date(exam_date) {
        Ok(date) => errors.ensure(
            date <= dates::today(),
            "exam_date",
            "Exam date cannot be in the future",
        ),
        Err(_) => errors.add("exam_date", "Exam date must be in YYYY-MM-DD format"),
    }
}

impl CreateExamRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.ensure(!self.title.trim().is_empty(), "title", "Title is required");
        errors.ensure(
            self.total_marks.is_finite() && self.total_marks > 0.0,
            "total_marks",
            "Total marks must be greater than zero",
        );
        validate_exam_date(&self.exam_date, &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct UpdateExamRequest {
    pub title: Option<String>,
    pub exam_type: Option<ExamType>,
    pub exam_date: Option<String>,
    pub total_marks: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateExamMarkRequest {
    pub exam_id: String,
    pub student_id: String,
    pub marks_obtained: f64,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct UpdateExamMarkRequest {
    pub marks_obtained: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamMarkListParams {
    pub exam_id: Option<String>,
}

/// 得分范围 0..=total
pub fn validate_marks_obtained(marks: f64, total: f64, errors: &mut ValidationErrors) {
    errors.ensure(
        marks.is_finite() && (0.0..=total).contains(&marks),
        "marks_obtained",
        format!("Marks must be between 0 and {total}"),
    );
}

/// 存储层考试过滤条件
#[derive(Debug, Clone, Default)]
pub struct ExamFilter {
    pub section_ids: Option<Vec<String>>,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub created_by: Option<String>,
    pub only_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_future_exam_date_rejected() {
        let tomorrow = dates::format_date(dates::today() + Duration::days(1));
        let mut errors = ValidationErrors::new();
        validate_exam_date(&tomorrow, &mut errors);
        assert!(errors.has("exam_date"));

        let mut errors = ValidationErrors::new();
        validate_exam_date(&dates::format_date(dates::today()), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_marks_range() {
        let mut errors = ValidationErrors::new();
        validate_marks_obtained(101.0, 100.0, &mut errors);
        assert!(errors.has("marks_obtained"));

        let mut errors = ValidationErrors::new();
        validate_marks_obtained(-1.0, 100.0, &mut errors);
        assert!(errors.has("marks_obtained"));

        let mut errors = ValidationErrors::new();
        validate_marks_obtained(100.0, 100.0, &mut errors);
        validate_marks_obtained(0.0, 100.0, &mut errors);
        assert!(errors.is_empty());
    }
}
