//! 作业提交状态

use sea_orm::entity::prelude::*;

use crate::models::homeworks::entities::HomeworkSubmission;
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "homework_submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub homework_id: String,
    pub student_id: String,
    pub submitted: bool,
    pub submission_date: Option<String>,
    pub updated_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homeworks::Entity",
        from = "Column::HomeworkId",
        to = "super::homeworks::Column::Id",
        on_delete = "Cascade"
    )]
    Homeworks,
}

impl Related<super::homeworks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Homeworks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> HomeworkSubmission {
        HomeworkSubmission {
            id: self.id,
            homework_id: self.homework_id,
            student_id: self.student_id,
            submitted: self.submitted,
            submission_date: self.submission_date,
            updated_by: self.updated_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
