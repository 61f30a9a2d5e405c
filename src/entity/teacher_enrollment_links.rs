//! 授课分配的多对多关联

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_enrollment_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub enrollment_id: String,
    /// track / section / subject
    pub target_kind: String,
    pub target_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher_enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::teacher_enrollments::Column::Id",
        on_delete = "Cascade"
    )]
    TeacherEnrollments,
}

impl Related<super::teacher_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
