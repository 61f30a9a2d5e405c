//! 分组（班级下的 section）

use sea_orm::entity::prelude::*;

use crate::models::curriculum::entities::Section;
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::curriculum_nodes::Entity",
        from = "Column::TrackId",
        to = "super::curriculum_nodes::Column::Id",
        on_delete = "Cascade"
    )]
    Track,
}

impl Related<super::curriculum_nodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Track.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_section(self) -> Section {
        Section {
            id: self.id,
            institution_id: self.institution_id,
            track_id: self.track_id,
            name: self.name,
            order: self.sort_order,
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
