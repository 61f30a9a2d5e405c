use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "exam.ts")]
    pub enum ExamType {
        Midterm => "midterm",
        Final => "final",
        ClassTest => "class_test",
        Other => "other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct Exam {
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub title: String,
    pub exam_type: ExamType,
    pub exam_date: String,
    pub total_marks: f64,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamMark {
    pub id: String,
    pub exam_id: String,
    pub student_id: String,
    pub marks_obtained: f64,
    pub remarks: Option<String>,
    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
