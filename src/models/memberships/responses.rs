use serde::Serialize;
use ts_rs::TS;

use super::entities::{Membership, MembershipRole};
use crate::models::users::entities::User;

// 我的机构列表项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct MyMembershipResponse {
    pub membership_id: String,
    pub institution_id: String,
    pub institution_name: String,
    pub role: MembershipRole,
}

// 机构成员
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct MemberResponse {
    pub membership: Membership,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct ParentChildResponse {
    pub id: String,
    pub parent_id: String,
    pub child_id: String,
    pub child_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
