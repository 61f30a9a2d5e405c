//! 机构通知

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::notices::entities::{Notice, NoticeType, TargetAudience};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub target_audience: String,
    pub notice_type: String,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notice(self) -> Notice {
        Notice {
            id: self.id,
            institution_id: self.institution_id,
            title: self.title,
            content: self.content,
            target_audience: parse_or(&self.target_audience, TargetAudience::All),
            notice_type: parse_or(&self.notice_type, NoticeType::General),
            created_by: self.created_by,
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
