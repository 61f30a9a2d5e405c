use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    /// 教师授课范围的关联目标
    pub enum EnrollmentTarget {
        Track => "track",
        Section => "section",
        Subject => "subject",
    }
}

// 教师授课关系
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct TeacherEnrollment {
    pub id: String,
    pub institution_id: String,
    pub user_id: String,
    pub track_ids: Vec<String>,
    pub section_ids: Vec<String>,
    pub subject_ids: Vec<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TeacherEnrollment {
    pub fn covers_track(&self, track_id: &str) -> bool {
        self.track_ids.iter().any(|id| id == track_id)
    }

    pub fn covers_section(&self, section_id: &str) -> bool {
        self.section_ids.iter().any(|id| id == section_id)
    }

    pub fn covers_subject(&self, subject_id: &str) -> bool {
        self.subject_ids.iter().any(|id| id == subject_id)
    }

    /// 同时覆盖分组与科目
    pub fn covers(&self, section_id: &str, subject_id: &str) -> bool {
        self.is_active && self.covers_section(section_id) && self.covers_subject(subject_id)
    }
}

// 学生入学关系
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct StudentEnrollment {
    pub id: String,
    pub institution_id: String,
    pub user_id: String,
    pub track_id: String,
    pub section_id: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_coverage() {
        let enrollment = TeacherEnrollment {
            id: "e".to_string(),
            institution_id: "i".to_string(),
            user_id: "t".to_string(),
            track_ids: vec!["track".to_string()],
            section_ids: vec!["sec-a".to_string()],
            subject_ids: vec!["math".to_string(), "physics".to_string()],
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!(enrollment.covers("sec-a", "physics"));
        assert!(!enrollment.covers("sec-b", "physics"));
        assert!(!enrollment.covers("sec-a", "biology"));

        let inactive = TeacherEnrollment {
            is_active: false,
            ..enrollment
        };
        assert!(!inactive.covers("sec-a", "math"));
    }
}
