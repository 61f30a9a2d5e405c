use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "payment.ts")]
    pub enum PaymentStatus {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
    }
}

// bKash 支付记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct BkashPayment {
    pub id: String,
    pub payment_id: String,
    pub invoice_number: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub trx_id: Option<String>,
    pub payer_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生月度学费缴纳
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct StudentFeePayment {
    pub id: String,
    pub enrollment_id: String,
    pub institution_id: String,
    pub bkash_payment_id: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    /// 当月第一天
    pub month: String,
    pub status: PaymentStatus,
    pub scholarship_applied: bool,
    #[ts(type = "string")]
    pub scholarship_amount: Decimal,
    pub paid_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 机构待结算记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct InstitutionPaymentTracker {
    pub id: String,
    pub institution_id: String,
    pub fee_payment_id: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    pub is_disbursed: bool,
    pub disbursed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
