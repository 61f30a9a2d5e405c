//! 学生月度缴费

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::payments::entities::{PaymentStatus, StudentFeePayment};
use crate::utils::{money::minor_to_decimal, ts_to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_fee_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub enrollment_id: String,
    pub institution_id: String,
    pub bkash_payment_id: String,
    pub amount_minor: i64,
    pub month: String,
    pub status: String,
    pub scholarship_applied: bool,
    pub scholarship_minor: i64,
    pub paid_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bkash_payments::Entity",
        from = "Column::BkashPaymentId",
        to = "super::bkash_payments::Column::Id",
        on_delete = "Cascade"
    )]
    BkashPayments,
    #[sea_orm(
        belongs_to = "super::student_enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::student_enrollments::Column::Id",
        on_delete = "Cascade"
    )]
    StudentEnrollments,
}

impl Related<super::bkash_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BkashPayments.def()
    }
}

impl Related<super::student_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee_payment(self) -> StudentFeePayment {
        StudentFeePayment {
            id: self.id,
            enrollment_id: self.enrollment_id,
            institution_id: self.institution_id,
            bkash_payment_id: self.bkash_payment_id,
            amount: minor_to_decimal(self.amount_minor),
            month: self.month,
            status: parse_or(&self.status, PaymentStatus::Pending),
            scholarship_applied: self.scholarship_applied,
            scholarship_amount: minor_to_decimal(self.scholarship_minor),
            paid_by: self.paid_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
