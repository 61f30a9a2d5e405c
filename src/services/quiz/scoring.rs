//! 作答计分

use std::collections::HashMap;

use crate::models::quiz::entities::{OptionLabel, Quiz, QuizQuestion, QuizResponse};

/// 客观题判分，简答题等待人工批改
pub fn judge(question: &QuizQuestion, selected: Option<OptionLabel>) -> Option<bool> {
    if !question.question_type.is_objective() {
        return None;
    }
    Some(selected.is_some() && selected == question.correct_label())
}

/// 单题得分
///
/// 人工分优先；答对得题目分值；答错且启用负分时扣分；未判定的不计分。
pub fn response_score(
    marks: f64,
    negative_marks: Option<f64>,
    is_correct: Option<bool>,
    manual_score: Option<f64>,
) -> f64 {
    if let Some(score) = manual_score {
        return score;
    }
    match is_correct {
        Some(true) => marks,
        Some(false) => -negative_marks.unwrap_or(0.0),
        None => 0.0,
    }
}

/// 测验启用负分时的扣分值
pub fn negative_marks(quiz: &Quiz) -> Option<f64> {
    quiz.enable_negative_marking
        .then_some(quiz.negative_marks)
        .flatten()
}

/// 作答总分，不低于零
pub fn attempt_score(
    quiz: &Quiz,
    questions: &HashMap<String, QuizQuestion>,
    responses: &[QuizResponse],
) -> f64 {
    let negative = negative_marks(quiz);
    let total: f64 = responses
        .iter()
        .map(|r| {
            let marks = questions.get(&r.question_id).map_or(0.0, |q| q.marks);
            response_score(marks, negative, r.is_correct, r.manual_score)
        })
        .sum();
    total.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::entities::{PublishStatus, QuestionType, QuizOption};

    fn question(id: &str, question_type: QuestionType, marks: f64) -> QuizQuestion {
        let options = match question_type {
            QuestionType::Short => vec![],
            _ => vec![
                QuizOption {
                    id: format!("{id}-a"),
                    label: OptionLabel::A,
                    text: "first".to_string(),
                    is_correct: Some(true),
                },
                QuizOption {
                    id: format!("{id}-b"),
                    label: OptionLabel::B,
                    text: "second".to_string(),
                    is_correct: Some(false),
                },
            ],
        };
        QuizQuestion {
            id: id.to_string(),
            track_id: "t".to_string(),
            stream_id: "st".to_string(),
            subject_id: "s".to_string(),
            module_id: "m".to_string(),
            unit_id: "u".to_string(),
            lesson_id: None,
            micro_lesson_id: None,
            question_type,
            text: "?".to_string(),
            image_url: None,
            marks,
            status: PublishStatus::Published,
            created_by: "teacher".to_string(),
            options,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn response(question_id: &str, is_correct: Option<bool>, manual: Option<f64>) -> QuizResponse {
        QuizResponse {
            id: format!("r-{question_id}"),
            attempt_id: "attempt".to_string(),
            question_id: question_id.to_string(),
            selected_option: None,
            short_answer: None,
            is_correct,
            manual_score: manual,
            created_at: chrono::Utc::now(),
        }
    }

    fn quiz(negative: Option<f64>) -> Quiz {
        Quiz {
            id: "quiz".to_string(),
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
            enable_negative_marking: negative.is_some(),
            negative_marks: negative,
            status: PublishStatus::Published,
            is_free: false,
            is_active: true,
            order: 0,
            created_by: "teacher".to_string(),
            question_ids: vec!["q1".to_string(), "q2".to_string(), "q3".to_string()],
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn bank() -> HashMap<String, QuizQuestion> {
        [
            question("q1", QuestionType::Mcq, 2.0),
            question("q2", QuestionType::Mcq, 1.0),
            question("q3", QuestionType::Short, 3.0),
        ]
        .into_iter()
        .map(|q| (q.id.clone(), q))
        .collect()
    }

    #[test]
    fn test_judge_objective_and_short() {
        let questions = bank();
        assert_eq!(judge(&questions["q1"], Some(OptionLabel::A)), Some(true));
        assert_eq!(judge(&questions["q1"], Some(OptionLabel::B)), Some(false));
        assert_eq!(judge(&questions["q1"], None), Some(false));
        assert_eq!(judge(&questions["q3"], None), None);
    }

    #[test]
    fn test_negative_marking_applies_only_when_enabled() {
        let questions = bank();
        let responses = vec![
            response("q1", Some(true), None),
            response("q2", Some(false), None),
            response("q3", None, None),
        ];
        assert_eq!(attempt_score(&quiz(None), &questions, &responses), 2.0);
        assert_eq!(attempt_score(&quiz(Some(0.5)), &questions, &responses), 1.5);
    }

    #[test]
    fn test_manual_score_overrides() {
        let questions = bank();
        let responses = vec![
            response("q1", Some(true), None),
            response("q3", Some(true), Some(2.5)),
        ];
        assert_eq!(attempt_score(&quiz(Some(1.0)), &questions, &responses), 4.5);
    }

    #[test]
    fn test_total_never_negative() {
        let questions = bank();
        let responses = vec![
            response("q1", Some(false), None),
            response("q2", Some(false), None),
        ];
        assert_eq!(attempt_score(&quiz(Some(1.0)), &questions, &responses), 0.0);
    }
}
