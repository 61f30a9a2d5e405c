use serde::Deserialize;
use ts_rs::TS;

use super::entities::Gender;
use crate::models::PaginationQuery;

// 用户列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 个人资料更新
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<String>,
}

/// 存储层创建用户参数
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_institution: bool,
    pub is_admission_seeker: bool,
    pub is_active: bool,
    pub is_staff: bool,
}

/// 角色标志位的增量更新
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleFlagsUpdate {
    pub is_institution: Option<bool>,
    pub is_teacher: Option<bool>,
    pub is_student: Option<bool>,
    pub is_parents: Option<bool>,
    pub is_admission_seeker: Option<bool>,
}
