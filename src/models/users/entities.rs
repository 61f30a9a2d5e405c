use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    /// 由用户标志位推导出的角色
    #[derive(TS)]
    #[ts(export, export_to = "user.ts")]
    pub enum UserRole {
        Admin => "admin",
        Institution => "institution",
        Teacher => "teacher",
        Student => "student",
        Parent => "parent",
        AdmissionSeeker => "admission_seeker",
    }
}

impl UserRole {
    pub fn admin_roles() -> &'static [UserRole] {
        &[UserRole::Admin]
    }

    /// 可以管理机构的角色
    pub fn institution_roles() -> &'static [UserRole] {
        &[UserRole::Institution, UserRole::Admin]
    }

    /// 可以授课、出题的角色
    pub fn teaching_roles() -> &'static [UserRole] {
        &[UserRole::Teacher, UserRole::Institution]
    }
}

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "user.ts")]
    pub enum Gender {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<String>,
    pub is_institution: bool,
    pub is_teacher: bool,
    pub is_student: bool,
    pub is_parents: bool,
    pub is_admission_seeker: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 用户持有的全部角色，按优先级排序
    pub fn roles(&self) -> Vec<UserRole> {
        [
            (self.is_staff, UserRole::Admin),
            (self.is_institution, UserRole::Institution),
            (self.is_teacher, UserRole::Teacher),
            (self.is_student, UserRole::Student),
            (self.is_parents, UserRole::Parent),
            (self.is_admission_seeker, UserRole::AdmissionSeeker),
        ]
        .into_iter()
        .filter_map(|(flag, role)| flag.then_some(role))
        .collect()
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles().contains(&role)
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    /// 写入 JWT 的主角色
    pub fn primary_role(&self) -> Option<UserRole> {
        self.roles().into_iter().next()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// 登录标识，优先邮箱
    pub fn identifier(&self) -> Option<&str> {
        self.email.as_deref().or(self.phone_number.as_deref())
    }

    pub fn generate_token_pair(&self) -> Result<crate::utils::jwt::TokenPair, String> {
        let role = self
            .primary_role()
            .map(|role| role.as_str())
            .unwrap_or("user");
        crate::utils::jwt::JwtUtils::generate_token_pair(&self.id, role)
            .map_err(|e| format!("Failed to generate token pair: {e}"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_user() -> User {
        User {
            id: "u-1".to_string(),
            email: Some("rahim@example.com".to_string()),
            phone_number: None,
            password_hash: String::new(),
            first_name: "Rahim".to_string(),
            last_name: "Uddin".to_string(),
            gender: None,
            birth_date: None,
            is_institution: false,
            is_teacher: false,
            is_student: false,
            is_parents: false,
            is_admission_seeker: false,
            is_active: true,
            is_staff: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_roles_from_flags() {
        let mut user = sample_user();
        assert!(user.roles().is_empty());
        assert_eq!(user.primary_role(), None);

        user.is_student = true;
        user.is_parents = true;
        assert_eq!(user.roles(), vec![UserRole::Student, UserRole::Parent]);
        assert_eq!(user.primary_role(), Some(UserRole::Student));
        assert!(user.has_any_role(&[UserRole::Teacher, UserRole::Parent]));
        assert!(!user.has_role(UserRole::Admin));

        user.is_staff = true;
        assert_eq!(user.primary_role(), Some(UserRole::Admin));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(
            "admission_seeker".parse::<UserRole>().unwrap(),
            UserRole::AdmissionSeeker
        );
        assert!("superuser".parse::<UserRole>().is_err());
        assert_eq!(
            serde_json::to_value(UserRole::Institution).unwrap(),
            "institution"
        );
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut user = sample_user();
        user.password_hash = "secret".to_string();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(user.display_name(), "Rahim Uddin");
    }
}
