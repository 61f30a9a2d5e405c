//! 题目选项

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::quiz::entities::{OptionLabel, QuizOption};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub question_id: String,
    pub label: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub is_correct: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quiz_questions::Entity",
        from = "Column::QuestionId",
        to = "super::quiz_questions::Column::Id",
        on_delete = "Cascade"
    )]
    QuizQuestions,
}

impl Related<super::quiz_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_option(self) -> QuizOption {
        QuizOption {
            id: self.id,
            label: parse_or(&self.label, OptionLabel::A),
            text: self.text,
            is_correct: Some(self.is_correct),
        }
    }
}
