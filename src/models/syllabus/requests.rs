use serde::Deserialize;
use ts_rs::TS;

use super::entities::SyllabusPurpose;
use crate::models::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "syllabus.ts")]
pub struct SyllabusListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub purpose: Option<SyllabusPurpose>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "syllabus.ts")]
pub struct CreateSyllabusRequest {
    pub institution_id: String,
    pub track_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub title: String,
    pub purpose: SyllabusPurpose,
    #[serde(default)]
    pub node_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "syllabus.ts")]
pub struct UpdateSyllabusRequest {
    pub title: Option<String>,
    pub purpose: Option<SyllabusPurpose>,
    pub node_ids: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// 存储层过滤条件
#[derive(Debug, Clone, Default)]
pub struct SyllabusFilter {
    pub section_ids: Option<Vec<String>>,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub purpose: Option<SyllabusPurpose>,
    pub only_active: bool,
}
