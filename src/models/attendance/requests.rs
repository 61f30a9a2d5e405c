use serde::Deserialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;
use crate::models::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct CreateAttendanceRequest {
    pub institution_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub student_id: String,
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct BulkAttendanceEntry {
    pub student_id: String,
    pub status: AttendanceStatus,
}

// 批量考勤，同一分组、科目、日期
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct BulkAttendanceRequest {
    pub institution_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub date: String,
    pub attendances: Vec<BulkAttendanceEntry>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct UpdateAttendanceRequest {
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub date: Option<String>,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceStatsParams {
    pub start_date: String,
    pub end_date: String,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
}

/// 新增考勤行
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub institution_id: String,
    pub student_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub created_by: String,
}

/// 考勤可见范围
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    /// 教师可见的 (分组, 科目) 组合
    pub section_subject_pairs: Option<Vec<(String, String)>>,
    pub student_ids: Option<Vec<String>>,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub student_id: Option<String>,
    pub date: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}
