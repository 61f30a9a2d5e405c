//! 测验

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::quiz::entities::{PublishStatus, Quiz};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quizzes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub section_id: Option<String>,
    pub stream_id: Option<String>,
    pub subject_id: String,
    pub module_id: Option<String>,
    pub unit_id: Option<String>,
    pub lesson_id: Option<String>,
    pub micro_lesson_id: Option<String>,
    pub title: String,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub timer_per_question: Option<i32>,
    pub enable_negative_marking: bool,
    #[sea_orm(column_type = "Double", nullable)]
    pub negative_marks: Option<f64>,
    pub status: String,
    pub is_free: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quiz_items::Entity")]
    QuizItems,
    #[sea_orm(has_many = "super::quiz_attempts::Entity")]
    QuizAttempts,
}

impl Related<super::quiz_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizItems.def()
    }
}

impl Related<super::quiz_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizAttempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `question_ids` 需按 sort_order 排好
    pub fn into_quiz(self, question_ids: Vec<String>) -> Quiz {
        Quiz {
            id: self.id,
            institution_id: self.institution_id,
            track_id: self.track_id,
            section_id: self.section_id,
            stream_id: self.stream_id,
            subject_id: self.subject_id,
            module_id: self.module_id,
            unit_id: self.unit_id,
            lesson_id: self.lesson_id,
            micro_lesson_id: self.micro_lesson_id,
            title: self.title,
            start_time: self.start_time.map(ts_to_datetime),
            end_time: self.end_time.map(ts_to_datetime),
            timer_per_question: self.timer_per_question,
            enable_negative_marking: self.enable_negative_marking,
            negative_marks: self.negative_marks,
            status: parse_or(&self.status, PublishStatus::Draft),
            is_free: self.is_free,
            is_active: self.is_active,
            order: self.sort_order,
            created_by: self.created_by,
            question_ids,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
