//! 全局课程目录条目

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::curriculum::entities::{ContentType, CurriculumLevel, GlobalCurriculumItem};
use crate::models::institutions::entities::InstitutionType;
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "global_curriculum_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub level: String,
    pub name: String,
    pub code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub content_type: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub institution_type: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::curriculum_nodes::Entity")]
    CurriculumNodes,
}

impl Related<super::curriculum_nodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurriculumNodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_global_item(self) -> GlobalCurriculumItem {
        GlobalCurriculumItem {
            id: self.id,
            level: parse_or(&self.level, CurriculumLevel::Track),
            name: self.name,
            code: self.code,
            description: self.description,
            content: self.content,
            content_type: self.content_type.and_then(|c| c.parse::<ContentType>().ok()),
            video_url: self.video_url,
            image_url: self.image_url,
            institution_type: parse_or(&self.institution_type, InstitutionType::Others),
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
