//! 测验作答记录

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::quiz::entities::{AttemptStatus, QuizAttempt};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_attempts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub institution_id: String,
    pub status: String,
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    pub started_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quizzes::Entity",
        from = "Column::QuizId",
        to = "super::quizzes::Column::Id",
        on_delete = "Cascade"
    )]
    Quizzes,
    #[sea_orm(has_many = "super::quiz_responses::Entity")]
    QuizResponses,
}

impl Related<super::quizzes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quizzes.def()
    }
}

impl Related<super::quiz_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizResponses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attempt(self) -> QuizAttempt {
        QuizAttempt {
            id: self.id,
            quiz_id: self.quiz_id,
            student_id: self.student_id,
            institution_id: self.institution_id,
            status: parse_or(&self.status, AttemptStatus::Started),
            score: self.score,
            started_at: ts_to_datetime(self.started_at),
            completed_at: self.completed_at.map(ts_to_datetime),
        }
    }
}
