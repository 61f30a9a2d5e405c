//! 考试实体

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::exams::entities::{Exam, ExamType};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub title: String,
    pub exam_type: String,
    pub exam_date: String,
    #[sea_orm(column_type = "Double")]
    pub total_marks: f64,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exam_marks::Entity")]
    ExamMarks,
}

impl Related<super::exam_marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamMarks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> Exam {
        Exam {
            id: self.id,
            institution_id: self.institution_id,
            track_id: self.track_id,
            section_id: self.section_id,
            subject_id: self.subject_id,
            title: self.title,
            exam_type: parse_or(&self.exam_type, ExamType::Other),
            exam_date: self.exam_date,
            total_marks: self.total_marks,
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
