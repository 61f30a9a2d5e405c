//! 单题作答

use sea_orm::entity::prelude::*;

use crate::models::quiz::entities::{OptionLabel, QuizResponse};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_responses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub attempt_id: String,
    pub question_id: String,
    pub selected_option: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub short_answer: Option<String>,
    pub is_correct: Option<bool>,
    #[sea_orm(column_type = "Double", nullable)]
    pub manual_score: Option<f64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quiz_attempts::Entity",
        from = "Column::AttemptId",
        to = "super::quiz_attempts::Column::Id",
        on_delete = "Cascade"
    )]
    QuizAttempts,
}

impl Related<super::quiz_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizAttempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_response(self) -> QuizResponse {
        QuizResponse {
            id: self.id,
            attempt_id: self.attempt_id,
            question_id: self.question_id,
            selected_option: self
                .selected_option
                .and_then(|o| o.parse::<OptionLabel>().ok()),
            short_answer: self.short_answer,
            is_correct: self.is_correct,
            manual_score: self.manual_score,
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
