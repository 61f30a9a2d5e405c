use serde::Serialize;
use ts_rs::TS;

use super::entities::{QuizAttempt, QuizQuestion, QuizResponse};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct SubmitQuizResponse {
    pub attempt_id: String,
    pub final_score: f64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct AttemptDetailResponse {
    pub attempt: QuizAttempt,
    pub quiz_title: String,
    pub responses: Vec<QuizResponse>,
}

// 家长查看子女作答
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct ParentAttemptResponse {
    pub attempt: QuizAttempt,
    pub quiz_title: String,
    pub child_id: String,
    pub child_name: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizQuestionsResponse {
    pub quiz_id: String,
    pub questions: Vec<QuizQuestion>,
}
