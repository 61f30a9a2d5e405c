//! 大纲覆盖的课程节点

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "syllabus_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub syllabus_id: String,
    pub node_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::syllabi::Entity",
        from = "Column::SyllabusId",
        to = "super::syllabi::Column::Id",
        on_delete = "Cascade"
    )]
    Syllabi,
}

impl Related<super::syllabi::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Syllabi.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
