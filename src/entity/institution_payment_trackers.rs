//! 机构待结算记录

use sea_orm::entity::prelude::*;

use crate::models::payments::entities::InstitutionPaymentTracker;
use crate::utils::{money::minor_to_decimal, ts_to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "institution_payment_trackers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    #[sea_orm(unique)]
    pub fee_payment_id: String,
    pub amount_minor: i64,
    pub is_disbursed: bool,
    pub disbursed_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_fee_payments::Entity",
        from = "Column::FeePaymentId",
        to = "super::student_fee_payments::Column::Id",
        on_delete = "Cascade"
    )]
    StudentFeePayments,
}

impl Related<super::student_fee_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentFeePayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_tracker(self) -> InstitutionPaymentTracker {
        InstitutionPaymentTracker {
            id: self.id,
            institution_id: self.institution_id,
            fee_payment_id: self.fee_payment_id,
            amount: minor_to_decimal(self.amount_minor),
            is_disbursed: self.is_disbursed,
            disbursed_at: self.disbursed_at.map(ts_to_datetime),
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
