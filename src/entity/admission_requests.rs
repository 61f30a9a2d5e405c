//! 入学申请实体

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::memberships::entities::{AdmissionRequest, AdmissionStatus};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admission_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub institution_id: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub processed_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_admission_request(self) -> AdmissionRequest {
        AdmissionRequest {
            id: self.id,
            user_id: self.user_id,
            institution_id: self.institution_id,
            status: parse_or(&self.status, AdmissionStatus::Pending),
            message: self.message,
            processed_by: self.processed_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
