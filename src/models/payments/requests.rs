use serde::Deserialize;
use ts_rs::TS;

use super::entities::PaymentStatus;
use crate::models::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct CreateFeePaymentRequest {
    pub enrollment_id: String,
    /// `YYYY-MM` 或 `YYYY-MM-DD`
    pub month: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct FeePaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub institution_id: Option<String>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct ExecutePaymentRequest {
    pub payment_id: String,
}

// bKash 回调携带的参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct BkashCallbackParams {
    #[serde(rename = "paymentID")]
    pub payment_id: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct QueryPaymentParams {
    pub payment_id: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct TrackerListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub institution_id: Option<String>,
    pub is_disbursed: Option<bool>,
}

/// 一次缴费需要写入的三张表
#[derive(Debug, Clone)]
pub struct NewFeePayment {
    pub payment_id: String,
    pub invoice_number: String,
    pub enrollment_id: String,
    pub institution_id: String,
    pub month: String,
    pub amount_minor: i64,
    pub scholarship_minor: i64,
    pub paid_by: String,
}

/// 存储层缴费过滤条件
#[derive(Debug, Clone, Default)]
pub struct FeePaymentFilter {
    pub enrollment_ids: Option<Vec<String>>,
    pub institution_ids: Option<Vec<String>>,
    pub status: Option<PaymentStatus>,
}
