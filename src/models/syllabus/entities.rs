use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "syllabus.ts")]
    pub enum SyllabusPurpose {
        YearlyExam => "yearly_exam",
        HalfYearly => "half_yearly",
        ClassTest => "class_test",
        Quiz => "quiz",
        Other => "other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "syllabus.ts")]
pub struct Syllabus {
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub title: String,
    pub purpose: SyllabusPurpose,
    /// subject 之下的 module / unit / lesson / micro_lesson 节点
    pub node_ids: Vec<String>,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
