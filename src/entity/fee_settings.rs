//! 学费设置

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::fees::entities::{FeeScope, FeeSetting};
use crate::utils::{money::minor_to_decimal, ts_to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub scope: String,
    pub target_id: String,
    pub amount_minor: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee_setting(self) -> FeeSetting {
        FeeSetting {
            id: self.id,
            institution_id: self.institution_id,
            scope: parse_or(&self.scope, FeeScope::Institution),
            target_id: self.target_id,
            amount: minor_to_decimal(self.amount_minor),
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
