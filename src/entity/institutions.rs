//! 机构实体

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::institutions::entities::{Institution, InstitutionType};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "institutions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(unique)]
    pub short_code: Option<String>,
    pub address: Option<String>,
    pub institution_type: String,
    pub is_active: bool,
    pub admin_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AdminId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Admin,
    #[sea_orm(has_many = "super::institution_memberships::Entity")]
    InstitutionMemberships,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::institution_memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstitutionMemberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_institution(self) -> Institution {
        Institution {
            id: self.id,
            name: self.name,
            description: self.description,
            short_code: self.short_code,
            address: self.address,
            institution_type: parse_or(&self.institution_type, InstitutionType::Others),
            is_active: self.is_active,
            admin_id: self.admin_id,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
