use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    /// 用户在机构中的身份
    #[derive(TS)]
    #[ts(export, export_to = "membership.ts")]
    pub enum MembershipRole {
        Admin => "admin",
        Teacher => "teacher",
        Student => "student",
    }
}

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "membership.ts")]
    pub enum AdmissionStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct Membership {
    pub id: String,
    pub institution_id: String,
    pub user_id: String,
    pub role: MembershipRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 机构邀请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct Invitation {
    pub id: String,
    pub institution_id: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: MembershipRole,
    pub token: String,
    pub invited_by: String,
    pub is_used: bool,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Invitation {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.expires_at <= now
    }

    /// 邀请的目标标识是否与用户一致
    pub fn matches_user(&self, email: Option<&str>, phone_number: Option<&str>) -> bool {
        match (&self.email, &self.phone_number) {
            (Some(invited), _) => email.is_some_and(|e| e.eq_ignore_ascii_case(invited)),
            (None, Some(invited)) => phone_number == Some(invited.as_str()),
            (None, None) => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct ParentChild {
    pub id: String,
    pub parent_id: String,
    pub child_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "membership.ts")]
pub struct AdmissionRequest {
    pub id: String,
    pub user_id: String,
    pub institution_id: String,
    pub status: AdmissionStatus,
    pub message: Option<String>,
    pub processed_by: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn invitation(email: Option<&str>, phone: Option<&str>) -> Invitation {
        Invitation {
            id: "inv".to_string(),
            institution_id: "inst".to_string(),
            email: email.map(str::to_string),
            phone_number: phone.map(str::to_string),
            role: MembershipRole::Teacher,
            token: "token".to_string(),
            invited_by: "admin".to_string(),
            is_used: false,
            expires_at: Utc::now() + Duration::days(7),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_invitation_matches_email_case_insensitive() {
        let inv = invitation(Some("teacher@school.com"), None);
        assert!(inv.matches_user(Some("Teacher@School.com"), None));
        assert!(!inv.matches_user(None, Some("01711111111")));
    }

    #[test]
    fn test_invitation_matches_phone() {
        let inv = invitation(None, Some("01711111111"));
        assert!(inv.matches_user(Some("x@y.com"), Some("01711111111")));
        assert!(!inv.matches_user(None, Some("01822222222")));
    }

    #[test]
    fn test_invitation_expiry() {
        let inv = invitation(Some("a@b.com"), None);
        assert!(!inv.is_expired(Utc::now()));
        assert!(inv.is_expired(Utc::now() + Duration::days(8)));
    }
}
