use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use super::entities::PaymentStatus;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct CreateFeePaymentResponse {
    pub payment_id: String,
    pub bkash_url: String,
    pub fee_payment_id: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    #[ts(type = "string")]
    pub scholarship_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct ExecutePaymentResponse {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub trx_id: Option<String>,
}
