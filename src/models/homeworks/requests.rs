use serde::Deserialize;
use ts_rs::TS;

use crate::models::{PaginationQuery, ValidationErrors};
use crate::utils::dates;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct HomeworkListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct CreateHomeworkRequest {
    pub institution_id: String,
    pub track_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
}

impl CreateHomeworkRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.ensure(!self.title.trim().is_empty(), "title", "Title is required");
        errors.ensure(
            dates::parse_date(&self.due_date).is_ok(),
            "due_date",
            "Due date must be in YYYY-MM-DD format",
        );
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct UpdateHomeworkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub is_active: Option<bool>,
}

// 教师标记学生提交情况
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct MarkSubmissionRequest {
    pub student_id: String,
    pub submitted: bool,
    pub submission_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct SubmissionListParams {
    pub student_id: Option<String>,
}

/// 存储层作业过滤条件
#[derive(Debug, Clone, Default)]
pub struct HomeworkFilter {
    pub section_ids: Option<Vec<String>>,
    pub section_subject_pairs: Option<Vec<(String, String)>>,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub created_by: Option<String>,
    pub only_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_date_format() {
        let req: CreateHomeworkRequest = serde_json::from_value(serde_json::json!({
            "institution_id": "i",
            "track_id": "t",
            "section_id": "s",
            "subject_id": "m",
            "title": "Essay",
            "due_date": "12/05/2025"
        }))
        .unwrap();
        assert!(req.validate().has("due_date"));
    }
}
