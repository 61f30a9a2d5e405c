use serde::Serialize;
use ts_rs::TS;

use crate::models::exams::entities::ExamType;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "result.ts")]
pub struct QuizResult {
    pub attempt_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub subject_id: String,
    pub score: f64,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "result.ts")]
pub struct ExamResult {
    pub exam_id: String,
    pub title: String,
    pub exam_type: ExamType,
    pub subject_id: String,
    pub exam_date: String,
    pub total_marks: f64,
    pub marks_obtained: f64,
    pub remarks: Option<String>,
}

// 单个学生在机构内的成绩汇总
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "result.ts")]
pub struct StudentResultsResponse {
    pub student_id: String,
    pub student_name: String,
    pub quiz_results: Vec<QuizResult>,
    pub exam_results: Vec<ExamResult>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "result.ts")]
pub struct SectionResultsResponse {
    pub section_id: String,
    pub subject_id: Option<String>,
    pub students: Vec<StudentResultsResponse>,
}
