use serde::Serialize;
use ts_rs::TS;

use crate::models::users::entities::User;

// 分组学生名单
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct SectionStudentResponse {
    pub enrollment_id: String,
    pub student: User,
}
