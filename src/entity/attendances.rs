//! 考勤记录

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::attendance::entities::{Attendance, AttendanceStatus};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub student_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub date: String,
    pub status: String,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance(self) -> Attendance {
        Attendance {
            id: self.id,
            institution_id: self.institution_id,
            student_id: self.student_id,
            section_id: self.section_id,
            subject_id: self.subject_id,
            date: self.date,
            status: parse_or(&self.status, AttendanceStatus::Present),
            created_by: self.created_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
