use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::quiz::requests::{
    AttemptListParams, CreateQuestionRequest, CreateQuizRequest, GradeResponseRequest,
    QuestionListParams, QuizListParams, SubmitQuizRequest, UpdateQuestionRequest,
    UpdateQuizRequest,
};
use crate::services::QuizService;
use crate::utils::SafeId;

static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);

// 题库
pub async fn create_question(
    req: HttpRequest,
    body: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.create_question(body.into_inner(), &req).await
}

pub async fn list_questions(
    req: HttpRequest,
    query: web::Query<QuestionListParams>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_questions(query.into_inner(), &req).await
}

pub async fn get_question(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_question(path.0, &req).await
}

pub async fn update_question(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .update_question(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_question(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.delete_question(path.0, &req).await
}

// 测验
pub async fn create_quiz(
    req: HttpRequest,
    body: web::Json<CreateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.create_quiz(body.into_inner(), &req).await
}

pub async fn list_quizzes(
    req: HttpRequest,
    query: web::Query<QuizListParams>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_quizzes(query.into_inner(), &req).await
}

pub async fn get_quiz(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_quiz(path.0, &req).await
}

pub async fn update_quiz(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .update_quiz(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_quiz(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.delete_quiz(path.0, &req).await
}

pub async fn quiz_questions(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.quiz_questions(path.0, &req).await
}

pub async fn start_quiz(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.start_quiz(path.0, &req).await
}

pub async fn submit_quiz(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<SubmitQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .submit_quiz(path.0, body.into_inner(), &req)
        .await
}

pub async fn grade_response(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<GradeResponseRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .grade_response(path.0, body.into_inner(), &req)
        .await
}

// 作答记录
pub async fn list_attempts(
    req: HttpRequest,
    query: web::Query<AttemptListParams>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_attempts(query.into_inner(), &req).await
}

pub async fn get_attempt(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_attempt(path.0, &req).await
}

pub async fn parent_attempts(req: HttpRequest) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.parent_attempts(&req).await
}

// 配置路由
pub fn configure_quiz_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/quiz")
            .wrap(RequireJWT)
            .service(
                web::resource("/questions")
                    .route(web::get().to(list_questions))
                    .route(web::post().to(create_question)),
            )
            .service(
                web::resource("/questions/{id}")
                    .route(web::get().to(get_question))
                    .route(web::put().to(update_question))
                    .route(web::delete().to(delete_question)),
            )
            // 作答记录的字面路径需在 /quizzes/{id} 之前
            .route("/attempts", web::get().to(list_attempts))
            .route("/attempts/children", web::get().to(parent_attempts))
            .route("/attempts/{id}", web::get().to(get_attempt))
            .service(
                web::resource("/quizzes")
                    .route(web::get().to(list_quizzes))
                    .route(web::post().to(create_quiz)),
            )
            .service(
                web::resource("/quizzes/{id}")
                    .route(web::get().to(get_quiz))
                    .route(web::put().to(update_quiz))
                    .route(web::delete().to(delete_quiz)),
            )
            .route("/quizzes/{id}/questions", web::get().to(quiz_questions))
            .route("/quizzes/{id}/start", web::post().to(start_quiz))
            .route("/quizzes/{id}/submit", web::post().to(submit_quiz))
            .route("/quizzes/{id}/grade", web::post().to(grade_response)),
    );
}
