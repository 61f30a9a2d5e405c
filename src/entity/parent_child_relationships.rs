//! 家长与子女关系实体

use sea_orm::entity::prelude::*;

use crate::models::memberships::entities::ParentChild;
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parent_child_relationships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub parent_id: String,
    pub child_id: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ChildId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Child,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Child.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_parent_child(self) -> ParentChild {
        ParentChild {
            id: self.id,
            parent_id: self.parent_id,
            child_id: self.child_id,
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
