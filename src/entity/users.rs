//! 用户实体

use sea_orm::entity::prelude::*;

use crate::models::users::entities::{Gender, User};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub is_institution: bool,
    pub is_teacher: bool,
    pub is_student: bool,
    pub is_parents: bool,
    pub is_admission_seeker: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::institution_memberships::Entity")]
    InstitutionMemberships,
    #[sea_orm(has_many = "super::student_enrollments::Entity")]
    StudentEnrollments,
    #[sea_orm(has_many = "super::teacher_enrollments::Entity")]
    TeacherEnrollments,
}

impl Related<super::institution_memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstitutionMemberships.def()
    }
}

impl Related<super::student_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentEnrollments.def()
    }
}

impl Related<super::teacher_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            phone_number: self.phone_number,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender.and_then(|g| g.parse::<Gender>().ok()),
            birth_date: self.birth_date,
            is_institution: self.is_institution,
            is_teacher: self.is_teacher,
            is_student: self.is_student,
            is_parents: self.is_parents,
            is_admission_seeker: self.is_admission_seeker,
            is_active: self.is_active,
            is_staff: self.is_staff,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
