//! 机构本地课程节点

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::curriculum::entities::{CurriculumLevel, CurriculumNode};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "curriculum_nodes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub level: String,
    pub parent_id: Option<String>,
    /// 所属 track，track 节点为自身 id
    pub track_id: String,
    pub section_id: Option<String>,
    pub global_item_id: String,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::global_curriculum_items::Entity",
        from = "Column::GlobalItemId",
        to = "super::global_curriculum_items::Column::Id",
        on_delete = "Cascade"
    )]
    GlobalCurriculumItems,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
}

impl Related<super::global_curriculum_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlobalCurriculumItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_node(self) -> CurriculumNode {
        CurriculumNode {
            id: self.id,
            institution_id: self.institution_id,
            level: parse_or(&self.level, CurriculumLevel::Track),
            parent_id: self.parent_id,
            track_id: self.track_id,
            section_id: self.section_id,
            global_item_id: self.global_item_id,
            name: self.name,
            order: self.sort_order,
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
