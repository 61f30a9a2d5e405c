use serde::Deserialize;
use ts_rs::TS;

use crate::models::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub institution_id: Option<String>,
    pub user_id: Option<String>,
    pub track_id: Option<String>,
    pub section_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct CreateTeacherEnrollmentRequest {
    pub institution_id: String,
    pub user_id: String,
    #[serde(default)]
    pub track_ids: Vec<String>,
    #[serde(default)]
    pub section_ids: Vec<String>,
    #[serde(default)]
    pub subject_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct UpdateTeacherEnrollmentRequest {
    pub track_ids: Option<Vec<String>>,
    pub section_ids: Option<Vec<String>>,
    pub subject_ids: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct CreateStudentEnrollmentRequest {
    pub institution_id: String,
    pub user_id: String,
    pub track_id: String,
    pub section_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct UpdateStudentEnrollmentRequest {
    pub track_id: Option<String>,
    pub section_id: Option<String>,
    pub is_active: Option<bool>,
}

/// 存储层过滤条件
#[derive(Debug, Clone, Default)]
pub struct EnrollmentFilter {
    pub institution_ids: Option<Vec<String>>,
    pub user_id: Option<String>,
    pub track_id: Option<String>,
    pub section_id: Option<String>,
    pub only_active: bool,
}
