use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::{bkash_payments, institution_payment_trackers, student_fee_payments};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    payments::{
        entities::{BkashPayment, InstitutionPaymentTracker, PaymentStatus, StudentFeePayment},
        requests::{FeePaymentFilter, NewFeePayment},
    },
};
use crate::storage::PaymentStorage;
use crate::utils::{new_id, now_ts};

#[async_trait]
impl PaymentStorage for SeaOrmStorage {
    async fn create_fee_payment(&self, payment: NewFeePayment) -> Result<StudentFeePayment> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let bkash = bkash_payments::ActiveModel {
            id: Set(new_id()),
            payment_id: Set(payment.payment_id),
            invoice_number: Set(payment.invoice_number),
            amount_minor: Set(payment.amount_minor),
            status: Set(PaymentStatus::Pending.to_string()),
            trx_id: Set(None),
            payer_id: Set(payment.paid_by.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建 bKash 支付记录失败", "Payment already recorded"))?;

        let fee_payment = student_fee_payments::ActiveModel {
            id: Set(new_id()),
            enrollment_id: Set(payment.enrollment_id),
            institution_id: Set(payment.institution_id.clone()),
            bkash_payment_id: Set(bkash.id),
            amount_minor: Set(payment.amount_minor),
            month: Set(payment.month),
            status: Set(PaymentStatus::Pending.to_string()),
            scholarship_applied: Set(payment.scholarship_minor > 0),
            scholarship_minor: Set(payment.scholarship_minor),
            paid_by: Set(payment.paid_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建学费缴纳记录失败", "Fee payment already exists"))?;

        institution_payment_trackers::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(payment.institution_id),
            fee_payment_id: Set(fee_payment.id.clone()),
            amount_minor: Set(payment.amount_minor),
            is_disbursed: Set(false),
            disbursed_at: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建机构结算记录失败", "Tracker already exists"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(fee_payment.into_fee_payment())
    }

    async fn find_open_fee_payment(
        &self,
        enrollment_id: &str,
        month: &str,
    ) -> Result<Option<StudentFeePayment>> {
        use student_fee_payments::Column;

        let result = student_fee_payments::Entity::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .filter(Column::Month.eq(month))
            .filter(Column::Status.is_in([
                PaymentStatus::Pending.as_str(),
                PaymentStatus::Completed.as_str(),
            ]))
            .order_by_desc(Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(db_error("查询学费缴纳失败"))?;

        Ok(result.map(|m| m.into_fee_payment()))
    }

    async fn get_fee_payment(&self, id: &str) -> Result<Option<StudentFeePayment>> {
        let result = student_fee_payments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询学费缴纳失败"))?;

        Ok(result.map(|m| m.into_fee_payment()))
    }

    async fn list_fee_payments(
        &self,
        filter: FeePaymentFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<StudentFeePayment>> {
        use student_fee_payments::Column;

        let mut select = student_fee_payments::Entity::find();
        if let Some(ids) = filter.enrollment_ids {
            select = select.filter(Column::EnrollmentId.is_in(ids));
        }
        if let Some(ids) = filter.institution_ids {
            select = select.filter(Column::InstitutionId.is_in(ids));
        }
        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        let select = select
            .order_by_desc(Column::Month)
            .order_by_desc(Column::CreatedAt);
        fetch_page(&self.db, select, &pagination, |m| m.into_fee_payment()).await
    }

    async fn get_bkash_payment(&self, payment_id: &str) -> Result<Option<BkashPayment>> {
        let result = bkash_payments::Entity::find()
            .filter(bkash_payments::Column::PaymentId.eq(payment_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询 bKash 支付记录失败"))?;

        Ok(result.map(|m| m.into_bkash_payment()))
    }

    async fn finish_payment(
        &self,
        payment_id: &str,
        status: PaymentStatus,
        trx_id: Option<String>,
    ) -> Result<Option<BkashPayment>> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = bkash_payments::Entity::find()
            .filter(bkash_payments::Column::PaymentId.eq(payment_id))
            .one(&txn)
            .await
            .map_err(db_error("查询 bKash 支付记录失败"))?
        else {
            return Ok(None);
        };
        let bkash_id = existing.id.clone();

        let mut model: bkash_payments::ActiveModel = existing.into();
        model.status = Set(status.to_string());
        if trx_id.is_some() {
            model.trx_id = Set(trx_id);
        }
        model.updated_at = Set(now);
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新 bKash 支付记录失败"))?;

        student_fee_payments::Entity::update_many()
            .col_expr(
                student_fee_payments::Column::Status,
                sea_orm::sea_query::Expr::value(status.as_str()),
            )
            .col_expr(
                student_fee_payments::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(student_fee_payments::Column::BkashPaymentId.eq(bkash_id))
            .exec(&txn)
            .await
            .map_err(db_error("更新学费缴纳状态失败"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(Some(updated.into_bkash_payment()))
    }

    async fn list_trackers(
        &self,
        institution_ids: &[String],
        is_disbursed: Option<bool>,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<InstitutionPaymentTracker>> {
        use institution_payment_trackers::Column;

        let mut select = institution_payment_trackers::Entity::find()
            .filter(Column::InstitutionId.is_in(institution_ids.iter().cloned()));
        if let Some(is_disbursed) = is_disbursed {
            select = select.filter(Column::IsDisbursed.eq(is_disbursed));
        }

        let select = select.order_by_desc(Column::CreatedAt);
        fetch_page(&self.db, select, &pagination, |m| m.into_tracker()).await
    }

    async fn get_tracker(&self, id: &str) -> Result<Option<InstitutionPaymentTracker>> {
        let result = institution_payment_trackers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询机构结算记录失败"))?;

        Ok(result.map(|m| m.into_tracker()))
    }

    async fn disburse_tracker(&self, id: &str) -> Result<Option<InstitutionPaymentTracker>> {
        let Some(existing) = institution_payment_trackers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询机构结算记录失败"))?
        else {
            return Ok(None);
        };

        let mut model: institution_payment_trackers::ActiveModel = existing.into();
        model.is_disbursed = Set(true);
        model.disbursed_at = Set(Some(now_ts()));
        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新机构结算记录失败"))?;

        Ok(Some(result.into_tracker()))
    }
}
