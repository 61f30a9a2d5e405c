use serde::Deserialize;
use ts_rs::TS;

use super::entities::{NoticeType, TargetAudience};
use crate::models::{PaginationQuery, ValidationErrors};

fn default_audience() -> TargetAudience {
    TargetAudience::All
}

fn default_notice_type() -> NoticeType {
    NoticeType::General
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct NoticeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub institution_id: Option<String>,
    pub notice_type: Option<NoticeType>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct CreateNoticeRequest {
    pub institution_id: String,
    pub title: String,
    pub content: String,
    #[serde(default = "default_audience")]
    pub target_audience: TargetAudience,
    #[serde(default = "default_notice_type")]
    pub notice_type: NoticeType,
}

impl CreateNoticeRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.ensure(!self.title.trim().is_empty(), "title", "Title is required");
        errors.ensure(!self.content.trim().is_empty(), "content", "Content is required");
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct UpdateNoticeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub target_audience: Option<TargetAudience>,
    pub notice_type: Option<NoticeType>,
    pub is_active: Option<bool>,
}

/// 存储层过滤条件：(机构, 可见受众) 列表
#[derive(Debug, Clone, Default)]
pub struct NoticeFilter {
    pub scopes: Vec<(String, Vec<TargetAudience>)>,
    pub notice_type: Option<NoticeType>,
    pub include_inactive: bool,
}
