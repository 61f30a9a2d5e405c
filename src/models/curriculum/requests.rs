use serde::Deserialize;
use ts_rs::TS;

use super::entities::ContentType;
use crate::models::PaginationQuery;
use crate::models::institutions::entities::InstitutionType;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct GlobalItemListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub institution_type: Option<InstitutionType>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct CreateGlobalItemRequest {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub content_type: Option<ContentType>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub institution_type: InstitutionType,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct UpdateGlobalItemRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub content_type: Option<ContentType>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub institution_type: Option<InstitutionType>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct NodeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub institution_id: Option<String>,
    pub parent_id: Option<String>,
    pub track_id: Option<String>,
    pub section_id: Option<String>,
}

// 本地节点创建请求，层级由路由决定
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct CreateNodeRequest {
    pub institution_id: String,
    pub parent_id: Option<String>,
    /// 仅 stream 可指定
    pub section_id: Option<String>,
    pub global_item_id: String,
    /// 缺省使用全局条目名称
    pub name: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct UpdateNodeRequest {
    pub name: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct SectionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub institution_id: Option<String>,
    pub track_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct CreateSectionRequest {
    pub institution_id: String,
    pub track_id: String,
    pub name: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct UpdateSectionRequest {
    pub name: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

/// 存储层节点过滤条件
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub institution_ids: Option<Vec<String>>,
    pub parent_id: Option<String>,
    pub track_id: Option<String>,
    pub section_id: Option<String>,
    pub ids: Option<Vec<String>>,
}

/// 存储层创建节点参数，track 节点的 `track_id` 为空时取自身 id
#[derive(Debug, Clone)]
pub struct NewNode {
    pub institution_id: String,
    pub level: super::entities::CurriculumLevel,
    pub parent_id: Option<String>,
    pub track_id: Option<String>,
    pub section_id: Option<String>,
    pub global_item_id: String,
    pub name: String,
    pub order: i32,
}
