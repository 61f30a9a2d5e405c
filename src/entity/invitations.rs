//! 邀请实体

use sea_orm::entity::prelude::*;

use super::parse_or;
use crate::models::memberships::entities::{Invitation, MembershipRole};
use crate::utils::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub institution_id: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: String,
    #[sea_orm(unique)]
    pub token: String,
    pub invited_by: String,
    pub is_used: bool,
    pub expires_at: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::institutions::Entity",
        from = "Column::InstitutionId",
        to = "super::institutions::Column::Id",
        on_delete = "Cascade"
    )]
    Institutions,
}

impl Related<super::institutions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institutions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_invitation(self) -> Invitation {
        Invitation {
            id: self.id,
            institution_id: self.institution_id,
            email: self.email,
            phone_number: self.phone_number,
            role: parse_or(&self.role, MembershipRole::Student),
            token: self.token,
            invited_by: self.invited_by,
            is_used: self.is_used,
            expires_at: ts_to_datetime(self.expires_at),
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
