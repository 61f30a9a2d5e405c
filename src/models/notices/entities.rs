use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;
use crate::models::memberships::entities::MembershipRole;

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "notice.ts")]
    pub enum TargetAudience {
        Students => "students",
        Teachers => "teachers",
        Parents => "parents",
        All => "all",
    }
}

impl TargetAudience {
    /// 某个机构身份可以看到的受众范围
    pub fn visible_to(role: MembershipRole) -> &'static [TargetAudience] {
        match role {
            MembershipRole::Admin => TargetAudience::ALL,
            MembershipRole::Teacher => &[TargetAudience::Teachers, TargetAudience::All],
            MembershipRole::Student => &[TargetAudience::Students, TargetAudience::All],
        }
    }
}

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "notice.ts")]
    pub enum NoticeType {
        General => "general",
        Urgent => "urgent",
        Event => "event",
        Announcement => "announcement",
        Alert => "alert",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct Notice {
    pub id: String,
    pub institution_id: String,
    pub title: String,
    pub content: String,
    pub target_audience: TargetAudience,
    pub notice_type: NoticeType,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_visibility() {
        let student = TargetAudience::visible_to(MembershipRole::Student);
        assert!(student.contains(&TargetAudience::All));
        assert!(student.contains(&TargetAudience::Students));
        assert!(!student.contains(&TargetAudience::Teachers));
        assert_eq!(TargetAudience::visible_to(MembershipRole::Admin).len(), 4);
    }
}
