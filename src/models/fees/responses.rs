use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use super::entities::FeeScope;

// 某个入学记录的应缴学费
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeQuoteResponse {
    pub enrollment_id: String,
    /// 生效的学费设置层级
    pub scope: FeeScope,
    #[ts(type = "string")]
    pub base_fee: Decimal,
    #[ts(type = "string | null")]
    pub scholarship_percentage: Option<Decimal>,
    #[ts(type = "string")]
    pub discount: Decimal,
    #[ts(type = "string")]
    pub payable: Decimal,
}
