use rust_decimal::Decimal;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::FeeScope;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct CreateFeeRequest {
    pub institution_id: String,
    pub scope: FeeScope,
    /// 机构级可省略
    pub target_id: Option<String>,
    #[ts(type = "string")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct UpdateFeeRequest {
    #[ts(type = "string")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeListParams {
    pub institution_id: Option<String>,
    pub scope: Option<FeeScope>,
}
