//! 题库题目

use sea_orm::entity::prelude::*;

use super::{parse_or, quiz_options};
use crate::models::quiz::entities::{PublishStatus, QuestionType, QuizQuestion};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub track_id: String,
    pub stream_id: String,
    pub subject_id: String,
    pub module_id: String,
    pub unit_id: String,
    pub lesson_id: Option<String>,
    pub micro_lesson_id: Option<String>,
    pub question_type: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub marks: f64,
    pub status: String,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quiz_options::Entity")]
    QuizOptions,
}

impl Related<super::quiz_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizOptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self, options: Vec<quiz_options::Model>) -> QuizQuestion {
        let mut options: Vec<_> = options.into_iter().map(|o| o.into_option()).collect();
        options.sort_by_key(|o| o.label.as_str());
        QuizQuestion {
            id: self.id,
            track_id: self.track_id,
            stream_id: self.stream_id,
            subject_id: self.subject_id,
            module_id: self.module_id,
            unit_id: self.unit_id,
            lesson_id: self.lesson_id,
            micro_lesson_id: self.micro_lesson_id,
            question_type: parse_or(&self.question_type, QuestionType::Mcq),
            text: self.text,
            image_url: self.image_url,
            marks: self.marks,
            status: parse_or(&self.status, PublishStatus::Draft),
            created_by: self.created_by,
            options,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
