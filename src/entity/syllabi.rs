//! 教学大纲

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::syllabus::entities::{Syllabus, SyllabusPurpose};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "syllabi")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub title: String,
    pub purpose: String,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::syllabus_items::Entity")]
    SyllabusItems,
}

impl Related<super::syllabus_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SyllabusItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_syllabus(self, node_ids: Vec<String>) -> Syllabus {
        Syllabus {
            id: self.id,
            institution_id: self.institution_id,
            track_id: self.track_id,
            section_id: self.section_id,
            subject_id: self.subject_id,
            title: self.title,
            purpose: parse_or(&self.purpose, SyllabusPurpose::Other),
            node_ids,
            created_by: self.created_by,
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
