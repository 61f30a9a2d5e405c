use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "quiz.ts")]
    pub enum QuestionType {
        Mcq => "mcq",
        TrueFalse => "true_false",
        Short => "short",
    }
}

impl QuestionType {
    /// 该题型允许的选项标签
    pub fn allowed_labels(&self) -> &'static [OptionLabel] {
        match self {
            QuestionType::Mcq => &[OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D],
            QuestionType::TrueFalse => &[OptionLabel::T, OptionLabel::F],
            QuestionType::Short => &[],
        }
    }

    pub fn is_objective(&self) -> bool {
        !matches!(self, QuestionType::Short)
    }
}

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "quiz.ts")]
    pub enum OptionLabel {
        A => "a",
        B => "b",
        C => "c",
        D => "d",
        T => "t",
        F => "f",
    }
}

define_str_enum! {
    /// 题目与测验的发布状态
    #[derive(TS)]
    #[ts(export, export_to = "quiz.ts")]
    pub enum PublishStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "quiz.ts")]
    pub enum AttemptStatus {
        Started => "started",
        Completed => "completed",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizOption {
    pub id: String,
    pub label: OptionLabel,
    pub text: String,
    /// 对学生隐藏时为空
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_correct: Option<bool>,
}

// 题库题目，挂在全局课程目录下
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizQuestion {
    pub id: String,
    pub track_id: String,
    pub stream_id: String,
    pub subject_id: String,
    pub module_id: String,
    pub unit_id: String,
    pub lesson_id: Option<String>,
    pub micro_lesson_id: Option<String>,
    pub question_type: QuestionType,
    pub text: String,
    pub image_url: Option<String>,
    pub marks: f64,
    pub status: PublishStatus,
    pub created_by: String,
    pub options: Vec<QuizOption>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl QuizQuestion {
    pub fn correct_label(&self) -> Option<OptionLabel> {
        self.options
            .iter()
            .find(|o| o.is_correct == Some(true))
            .map(|o| o.label)
    }

    /// 隐藏正确答案
    pub fn redacted(mut self) -> Self {
        for option in &mut self.options {
            option.is_correct = None;
        }
        self
    }
}

// 测验容器
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct Quiz {
    pub id: String,
    pub institution_id: String,
    pub track_id: String,
    pub section_id: Option<String>,
    pub stream_id: Option<String>,
    pub subject_id: String,
    pub module_id: Option<String>,
    pub unit_id: Option<String>,
    pub lesson_id: Option<String>,
    pub micro_lesson_id: Option<String>,
    pub title: String,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    /// 每题限时（秒）
    pub timer_per_question: Option<i32>,
    pub enable_negative_marking: bool,
    pub negative_marks: Option<f64>,
    pub status: PublishStatus,
    pub is_free: bool,
    pub is_active: bool,
    pub order: i32,
    pub created_by: String,
    pub question_ids: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Quiz {
    /// 是否处于可作答时间窗口内
    pub fn is_open_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.start_time.is_none_or(|start| now >= start) && self.end_time.is_none_or(|end| now <= end)
    }

    pub fn is_available(&self) -> bool {
        self.is_active && self.status == PublishStatus::Published
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub institution_id: String,
    pub status: AttemptStatus,
    pub score: f64,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizResponse {
    pub id: String,
    pub attempt_id: String,
    pub question_id: String,
    pub selected_option: Option<OptionLabel>,
    pub short_answer: Option<String>,
    /// 简答题批改前为空
    pub is_correct: Option<bool>,
    pub manual_score: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn quiz() -> Quiz {
        Quiz {
            id: "q".to_string(),
            institution_id: "i".to_string(),
            track_id: "t".to_string(),
            section_id: None,
            stream_id: None,
            subject_id: "s".to_string(),
            module_id: None,
            unit_id: None,
            lesson_id: None,
            micro_lesson_id: None,
            title: "Weekly".to_string(),
            start_time: None,
            end_time: None,
            timer_per_question: None,
            enable_negative_marking: false,
            negative_marks: None,
            status: PublishStatus::Published,
            is_free: false,
            is_active: true,
            order: 0,
            created_by: "teacher".to_string(),
            question_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_window() {
        let now = Utc::now();
        let mut q = quiz();
        assert!(q.is_open_at(now));
        q.start_time = Some(now + Duration::hours(1));
        assert!(!q.is_open_at(now));
        q.start_time = Some(now - Duration::hours(2));
        q.end_time = Some(now - Duration::hours(1));
        assert!(!q.is_open_at(now));
        q.end_time = Some(now + Duration::hours(1));
        assert!(q.is_open_at(now));
    }

    #[test]
    fn test_availability() {
        let mut q = quiz();
        assert!(q.is_available());
        q.status = PublishStatus::Draft;
        assert!(!q.is_available());
    }

    #[test]
    fn test_allowed_labels() {
        assert!(QuestionType::Mcq.allowed_labels().contains(&OptionLabel::C));
        assert!(!QuestionType::TrueFalse.allowed_labels().contains(&OptionLabel::A));
        assert!(QuestionType::Short.allowed_labels().is_empty());
    }
}
