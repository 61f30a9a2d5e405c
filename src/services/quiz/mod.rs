pub mod attempts;
pub mod questions;
pub mod quizzes;
pub mod scoring;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    quiz::{
        entities::Quiz,
        requests::{
            AttemptListParams, CreateQuestionRequest, CreateQuizRequest, GradeResponseRequest,
            QuestionListParams, QuizListParams, SubmitQuizRequest, UpdateQuestionRequest,
            UpdateQuizRequest,
        },
    },
};
use crate::storage::Storage;

crate::services::define_service!(QuizService);

pub(crate) async fn load_quiz(
    storage: &Arc<dyn Storage>,
    id: &str,
) -> Result<std::result::Result<Quiz, HttpResponse>> {
    Ok(storage.get_quiz(id).await?.ok_or_else(|| {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Quiz not found",
        ))
    }))
}

impl QuizService {
    // 题库
    pub async fn create_question(
        &self,
        req: CreateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::create_question(self, req, request).await
    }

    pub async fn list_questions(
        &self,
        params: QuestionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::list_questions(self, params, request).await
    }

    pub async fn get_question(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        questions::get_question(self, id, request).await
    }

    pub async fn update_question(
        &self,
        id: String,
        update: UpdateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::update_question(self, id, update, request).await
    }

    pub async fn delete_question(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        questions::delete_question(self, id, request).await
    }

    // 测验
    pub async fn create_quiz(
        &self,
        req: CreateQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        quizzes::create_quiz(self, req, request).await
    }

    pub async fn list_quizzes(
        &self,
        params: QuizListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        quizzes::list_quizzes(self, params, request).await
    }

    pub async fn get_quiz(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        quizzes::get_quiz(self, id, request).await
    }

    pub async fn update_quiz(
        &self,
        id: String,
        update: UpdateQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        quizzes::update_quiz(self, id, update, request).await
    }

    pub async fn delete_quiz(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        quizzes::delete_quiz(self, id, request).await
    }

    pub async fn quiz_questions(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        quizzes::quiz_questions(self, id, request).await
    }

    // 作答
    pub async fn start_quiz(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attempts::start_quiz(self, id, request).await
    }

    pub async fn submit_quiz(
        &self,
        id: String,
        req: SubmitQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::submit_quiz(self, id, req, request).await
    }

    pub async fn grade_response(
        &self,
        id: String,
        req: GradeResponseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::grade_response(self, id, req, request).await
    }

    pub async fn list_attempts(
        &self,
        params: AttemptListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::list_attempts(self, params, request).await
    }

    pub async fn get_attempt(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attempts::get_attempt(self, id, request).await
    }

    pub async fn parent_attempts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attempts::parent_attempts(self, request).await
    }
}
