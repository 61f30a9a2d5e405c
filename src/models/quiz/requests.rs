use std::collections::HashSet;

use serde::Deserialize;
use ts_rs::TS;

use super::entities::{OptionLabel, PublishStatus, QuestionType};
use crate::models::{PaginationQuery, ValidationErrors};

fn default_marks() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_draft() -> PublishStatus {
    PublishStatus::Draft
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuestionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub track_id: Option<String>,
    pub stream_id: Option<String>,
    pub subject_id: Option<String>,
    pub module_id: Option<String>,
    pub unit_id: Option<String>,
    pub lesson_id: Option<String>,
    pub micro_lesson_id: Option<String>,
    pub question_type: Option<QuestionType>,
    pub status: Option<PublishStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct OptionInput {
    pub label: OptionLabel,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// 校验选项与题型匹配：客观题恰好一个正确答案，简答题无选项
pub fn validate_options(
    question_type: QuestionType,
    options: &[OptionInput],
    errors: &mut ValidationErrors,
) {
    if !question_type.is_objective() {
        errors.ensure(
            options.is_empty(),
            "options",
            "Short answer questions cannot have options",
        );
        return;
    }

    let allowed = question_type.allowed_labels();
    let mut seen = HashSet::new();
    for option in options {
        if !allowed.contains(&option.label) {
            errors.add(
                "options",
                format!(
                    "Label '{}' is not valid for {} questions",
                    option.label, question_type
                ),
            );
        }
        if !seen.insert(option.label) {
            errors.add("options", format!("Duplicate option label '{}'", option.label));
        }
        errors.ensure(
            !option.text.trim().is_empty(),
            "options",
            "Option text is required",
        );
    }

    if question_type == QuestionType::TrueFalse {
        errors.ensure(
            options.len() == 2,
            "options",
            "True/false questions need exactly two options",
        );
    } else {
        errors.ensure(
            options.len() >= 2,
            "options",
            "Multiple choice questions need at least two options",
        );
    }

    let correct = options.iter().filter(|o| o.is_correct).count();
    errors.ensure(
        correct == 1,
        "options",
        "Exactly one option must be marked correct",
    );
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct CreateQuestionRequest {
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
    #[serde(default = "default_marks")]
    pub marks: f64,
    #[serde(default = "default_draft")]
    pub status: PublishStatus,
    #[serde(default)]
    pub options: Vec<OptionInput>,
}

impl CreateQuestionRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.ensure(!self.text.trim().is_empty(), "text", "Question text is required");
        errors.ensure(
            self.marks.is_finite() && self.marks > 0.0,
            "marks",
            "Marks must be greater than zero",
        );
        errors.ensure(
            self.micro_lesson_id.is_none() || self.lesson_id.is_some(),
            "micro_lesson_id",
            "A micro-lesson requires its lesson",
        );
        validate_options(self.question_type, &self.options, &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct UpdateQuestionRequest {
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub marks: Option<f64>,
    pub status: Option<PublishStatus>,
    /// 提供时整体替换选项
    pub options: Option<Vec<OptionInput>>,
}

impl UpdateQuestionRequest {
    pub fn validate(&self, question_type: QuestionType) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Some(text) = &self.text {
            errors.ensure(!text.trim().is_empty(), "text", "Question text is required");
        }
        if let Some(marks) = self.marks {
            errors.ensure(
                marks.is_finite() && marks > 0.0,
                "marks",
                "Marks must be greater than zero",
            );
        }
        if let Some(options) = &self.options {
            validate_options(question_type, options, &mut errors);
        }
        errors
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<PublishStatus>,
    pub subject_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct CreateQuizRequest {
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
    pub timer_per_question: Option<i32>,
    #[serde(default)]
    pub enable_negative_marking: bool,
    pub negative_marks: Option<f64>,
    #[serde(default = "default_draft")]
    pub status: PublishStatus,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
    pub question_ids: Vec<String>,
}

/// 负分设置：启用时必须大于零，未启用时不能填写
pub fn validate_negative_marking(
    enabled: bool,
    negative_marks: Option<f64>,
    errors: &mut ValidationErrors,
) {
    match (enabled, negative_marks) {
        (true, Some(marks)) if marks > 0.0 && marks.is_finite() => {}
        (true, _) => errors.add(
            "negative_marks",
            "Negative marks must be greater than zero when negative marking is enabled",
        ),
        (false, Some(marks)) if marks != 0.0 => errors.add(
            "negative_marks",
            "Negative marks can only be set when negative marking is enabled",
        ),
        (false, _) => {}
    }
}

impl CreateQuizRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.ensure(!self.title.trim().is_empty(), "title", "Title is required");
        validate_negative_marking(
            self.enable_negative_marking,
            self.negative_marks,
            &mut errors,
        );
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            errors.ensure(start < end, "end_time", "End time must be after start time");
        }
        if let Some(timer) = self.timer_per_question {
            errors.ensure(
                timer > 0,
                "timer_per_question",
                "Timer must be a positive number of seconds",
            );
        }
        errors.ensure(
            !self.question_ids.is_empty(),
            "question_ids",
            "At least one question is required",
        );
        let unique: HashSet<_> = self.question_ids.iter().collect();
        errors.ensure(
            unique.len() == self.question_ids.len(),
            "question_ids",
            "Duplicate questions are not allowed",
        );
        errors.ensure(
            self.unit_id.is_none() || self.module_id.is_some(),
            "unit_id",
            "A unit requires its module",
        );
        errors.ensure(
            self.lesson_id.is_none() || self.unit_id.is_some(),
            "lesson_id",
            "A lesson requires its unit",
        );
        errors.ensure(
            self.micro_lesson_id.is_none() || self.lesson_id.is_some(),
            "micro_lesson_id",
            "A micro-lesson requires its lesson",
        );
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub timer_per_question: Option<i32>,
    pub enable_negative_marking: Option<bool>,
    pub negative_marks: Option<f64>,
    pub status: Option<PublishStatus>,
    pub is_free: Option<bool>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
    pub question_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct AnswerInput {
    pub question_id: String,
    pub selected_option: Option<OptionLabel>,
    pub short_answer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct SubmitQuizRequest {
    pub attempt_id: String,
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct GradeResponseRequest {
    pub response_id: String,
    pub manual_score: f64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct AttemptListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub quiz_id: Option<String>,
}

/// 存储层创建测验参数
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub request: CreateQuizRequest,
    pub created_by: String,
}

/// 提交时写入的单题作答
#[derive(Debug, Clone)]
pub struct ResponseDraft {
    pub question_id: String,
    pub selected_option: Option<OptionLabel>,
    pub short_answer: Option<String>,
    pub is_correct: Option<bool>,
}

/// 存储层作答记录过滤条件
#[derive(Debug, Clone, Default)]
pub struct AttemptFilter {
    pub quiz_ids: Option<Vec<String>>,
    pub student_ids: Option<Vec<String>>,
    pub quiz_id: Option<String>,
    pub institution_id: Option<String>,
    pub only_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(label: OptionLabel, correct: bool) -> OptionInput {
        OptionInput {
            label,
            text: format!("option {label}"),
            is_correct: correct,
        }
    }

    #[test]
    fn test_mcq_requires_single_correct() {
        let mut errors = ValidationErrors::new();
        validate_options(
            QuestionType::Mcq,
            &[option(OptionLabel::A, true), option(OptionLabel::B, true)],
            &mut errors,
        );
        assert!(errors.has("options"));

        let mut errors = ValidationErrors::new();
        validate_options(
            QuestionType::Mcq,
            &[
                option(OptionLabel::A, false),
                option(OptionLabel::B, true),
                option(OptionLabel::C, false),
            ],
            &mut errors,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_true_false_labels() {
        let mut errors = ValidationErrors::new();
        validate_options(
            QuestionType::TrueFalse,
            &[option(OptionLabel::A, true), option(OptionLabel::F, false)],
            &mut errors,
        );
        assert!(errors.has("options"));

        let mut errors = ValidationErrors::new();
        validate_options(
            QuestionType::TrueFalse,
            &[option(OptionLabel::T, true), option(OptionLabel::F, false)],
            &mut errors,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_short_rejects_options() {
        let mut errors = ValidationErrors::new();
        validate_options(QuestionType::Short, &[option(OptionLabel::A, true)], &mut errors);
        assert!(errors.has("options"));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut errors = ValidationErrors::new();
        validate_options(
            QuestionType::Mcq,
            &[option(OptionLabel::A, true), option(OptionLabel::A, false)],
            &mut errors,
        );
        assert!(errors.has("options"));
    }

    #[test]
    fn test_negative_marking_rules() {
        let mut errors = ValidationErrors::new();
        validate_negative_marking(true, None, &mut errors);
        assert!(errors.has("negative_marks"));

        let mut errors = ValidationErrors::new();
        validate_negative_marking(true, Some(0.0), &mut errors);
        assert!(errors.has("negative_marks"));

        let mut errors = ValidationErrors::new();
        validate_negative_marking(false, Some(0.5), &mut errors);
        assert!(errors.has("negative_marks"));

        let mut errors = ValidationErrors::new();
        validate_negative_marking(true, Some(0.25), &mut errors);
        validate_negative_marking(false, None, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_quiz_requires_questions() {
        let req: CreateQuizRequest = serde_json::from_value(serde_json::json!({
            "institution_id": "i",
            "track_id": "t",
            "subject_id": "s",
            "title": "Chapter test",
            "question_ids": []
        }))
        .unwrap();
        let errors = req.validate();
        assert!(errors.has("question_ids"));
        assert!(!errors.has("title"));
        assert_eq!(req.status, PublishStatus::Draft);
        assert!(req.is_active);
    }
}
