//! bKash 支付记录

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::payments::entities::{BkashPayment, PaymentStatus};
use crate::utils::{money::minor_to_decimal, ts_to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bkash_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// 网关返回的 paymentID
    #[sea_orm(unique)]
    pub payment_id: String,
    pub invoice_number: String,
    pub amount_minor: i64,
    pub status: String,
    pub trx_id: Option<String>,
    pub payer_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student_fee_payments::Entity")]
    StudentFeePayments,
}

impl Related<super::student_fee_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentFeePayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_bkash_payment(self) -> BkashPayment {
        BkashPayment {
            id: self.id,
            payment_id: self.payment_id,
            invoice_number: self.invoice_number,
            amount: minor_to_decimal(self.amount_minor),
            status: parse_or(&self.status, PaymentStatus::Pending),
            trx_id: self.trx_id,
            payer_id: self.payer_id,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
