use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct Homework {
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 作业提交状态，每个学生一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "homework.ts")]
pub struct HomeworkSubmission {
    pub id: String,
    pub homework_id: String,
    pub student_id: String,
    pub submitted: bool,
    pub submission_date: Option<String>,
    pub updated_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
