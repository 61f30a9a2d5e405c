use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 奖学金，按学生入学记录减免学费百分比
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "scholarship.ts")]
pub struct Scholarship {
    pub id: String,
    pub institution_id: String,
    pub student_enrollment_id: String,
    #[ts(type = "string")]
    pub percentage: Decimal,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
