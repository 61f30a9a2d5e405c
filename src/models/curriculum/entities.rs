use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;
use crate::models::institutions::entities::InstitutionType;

define_str_enum! {
    /// 课程层级，自上而下
    #[derive(TS)]
    #[ts(export, export_to = "curriculum.ts")]
    pub enum CurriculumLevel {
        Track => "track",
        Stream => "stream",
        Subject => "subject",
        Module => "module",
        Unit => "unit",
        Lesson => "lesson",
        MicroLesson => "micro_lesson",
    }
}

impl CurriculumLevel {
    /// 上一级层级，track 没有上级
    pub fn parent(&self) -> Option<CurriculumLevel> {
        match self {
            CurriculumLevel::Track => None,
            CurriculumLevel::Stream => Some(CurriculumLevel::Track),
            CurriculumLevel::Subject => Some(CurriculumLevel::Stream),
            CurriculumLevel::Module => Some(CurriculumLevel::Subject),
            CurriculumLevel::Unit => Some(CurriculumLevel::Module),
            CurriculumLevel::Lesson => Some(CurriculumLevel::Unit),
            CurriculumLevel::MicroLesson => Some(CurriculumLevel::Lesson),
        }
    }

    pub fn depth(&self) -> usize {
        Self::ALL.iter().position(|l| l == self).unwrap_or(0)
    }

    /// 是否位于 subject 之下（可被大纲引用）
    pub fn is_below_subject(&self) -> bool {
        self.depth() > CurriculumLevel::Subject.depth()
    }
}

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "curriculum.ts")]
    pub enum ContentType {
        Video => "video",
        Quiz => "quiz",
        Activity => "activity",
        Text => "text",
    }
}

// 全局课程目录条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct GlobalCurriculumItem {
    pub id: String,
    pub level: CurriculumLevel,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub content_type: Option<ContentType>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub institution_type: InstitutionType,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 机构本地课程节点
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct CurriculumNode {
    pub id: String,
    pub institution_id: String,
    pub level: CurriculumLevel,
    pub parent_id: Option<String>,
    /// 所属 track，track 节点指向自身
    pub track_id: String,
    pub section_id: Option<String>,
    pub global_item_id: String,
    pub name: String,
    pub order: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 班级分组（隶属于 track）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "curriculum.ts")]
pub struct Section {
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub name: String,
    pub order: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_chain() {
        assert_eq!(CurriculumLevel::Track.parent(), None);
        assert_eq!(
            CurriculumLevel::MicroLesson.parent(),
            Some(CurriculumLevel::Lesson)
        );
        let mut level = CurriculumLevel::MicroLesson;
        let mut steps = 0;
        while let Some(parent) = level.parent() {
            level = parent;
            steps += 1;
        }
        assert_eq!(level, CurriculumLevel::Track);
        assert_eq!(steps, 6);
    }

    #[test]
    fn test_below_subject() {
        assert!(!CurriculumLevel::Subject.is_below_subject());
        assert!(!CurriculumLevel::Stream.is_below_subject());
        assert!(CurriculumLevel::Module.is_below_subject());
        assert!(CurriculumLevel::MicroLesson.is_below_subject());
    }

    #[test]
    fn test_level_from_path() {
        assert_eq!(
            "micro_lesson".parse::<CurriculumLevel>().unwrap(),
            CurriculumLevel::MicroLesson
        );
        assert!("chapter".parse::<CurriculumLevel>().is_err());
    }
}
