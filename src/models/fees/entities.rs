use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    /// 学费设置的作用范围，学生级优先于 track 级，再到机构级
    #[derive(TS)]
    #[ts(export, export_to = "fee.ts")]
    pub enum FeeScope {
        Institution => "institution",
        Track => "track",
        Student => "student",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeSetting {
    pub id: String,
    pub institution_id: String,
    pub scope: FeeScope,
    /// 机构 ID、track ID 或学生入学记录 ID
    pub target_id: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
