//! 奖学金

use sea_orm::entity::prelude::*;

use crate::models::scholarships::entities::Scholarship;
use crate::utils::{money::hundredths_to_percent, ts_to_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scholarships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub student_enrollment_id: String,
    pub percentage_hundredths: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_enrollments::Entity",
        from = "Column::StudentEnrollmentId",
        to = "super::student_enrollments::Column::Id",
        on_delete = "Cascade"
    )]
    StudentEnrollments,
}

impl Related<super::student_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentEnrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_scholarship(self) -> Scholarship {
        Scholarship {
            id: self.id,
            institution_id: self.institution_id,
            student_enrollment_id: self.student_enrollment_id,
            percentage: hundredths_to_percent(self.percentage_hundredths),
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
