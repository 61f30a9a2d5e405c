use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AdmissionStatus, MembershipRole};
use crate::models::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct MemberListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<MembershipRole>,
}

// 邀请教师或学生加入机构
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct CreateInvitationRequest {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: MembershipRole,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct AcceptInvitationRequest {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct CreateParentChildRequest {
    pub child_id: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct CreateAdmissionRequest {
    pub institution_id: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct AdmissionListParams {
    pub status: Option<AdmissionStatus>,
}

/// 存储层创建邀请参数
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub institution_id: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: MembershipRole,
    pub invited_by: String,
    pub expires_at: i64,
}
