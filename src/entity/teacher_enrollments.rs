//! 教师授课分配

use sea_orm::entity::prelude::*;

use super::teacher_enrollment_links;
use crate::models::enrollments::entities::{EnrollmentTarget, TeacherEnrollment};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub user_id: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::teacher_enrollment_links::Entity")]
    Links,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::teacher_enrollment_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 合并关联表中的 track / section / subject
    pub fn into_teacher_enrollment(
        self,
        links: Vec<teacher_enrollment_links::Model>,
    ) -> TeacherEnrollment {
        let mut enrollment = TeacherEnrollment {
            id: self.id,
            institution_id: self.institution_id,
            user_id: self.user_id,
            track_ids: Vec::new(),
            section_ids: Vec::new(),
            subject_ids: Vec::new(),
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        };
        for link in links {
            match link.target_kind.parse::<EnrollmentTarget>() {
                Ok(EnrollmentTarget::Track) => enrollment.track_ids.push(link.target_id),
                Ok(EnrollmentTarget::Section) => enrollment.section_ids.push(link.target_id),
                Ok(EnrollmentTarget::Subject) => enrollment.subject_ids.push(link.target_id),
                Err(_) => {}
            }
        }
        enrollment
    }
}
