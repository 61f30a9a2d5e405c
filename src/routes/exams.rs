use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::exams::requests::{
    CreateExamMarkRequest, CreateExamRequest, ExamListParams, ExamMarkListParams,
    UpdateExamMarkRequest, UpdateExamRequest,
};
use crate::services::ExamService;
use crate::utils::SafeId;

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn create_exam(
    req: HttpRequest,
    body: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(body.into_inner(), &req).await
}

pub async fn list_exams(
    req: HttpRequest,
    query: web::Query<ExamListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(query.into_inner(), &req).await
}

pub async fn created_exams(
    req: HttpRequest,
    query: web::Query<ExamListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.created_exams(query.into_inner(), &req).await
}

pub async fn get_exam(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_exam(path.0, &req).await
}

pub async fn update_exam(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_exam(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_exam(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(path.0, &req).await
}

pub async fn create_mark(
    req: HttpRequest,
    body: web::Json<CreateExamMarkRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_mark(body.into_inner(), &req).await
}

pub async fn list_marks(
    req: HttpRequest,
    query: web::Query<ExamMarkListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_marks(query.into_inner(), &req).await
}

pub async fn update_mark(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateExamMarkRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_mark(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_mark(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_mark(path.0, &req).await
}

// 配置路由
pub fn configure_exam_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_exams))
                    .route(web::post().to(create_exam)),
            )
            .route("/created", web::get().to(created_exams))
            .service(
                web::resource("/marks")
                    .route(web::get().to(list_marks))
                    .route(web::post().to(create_mark)),
            )
            .service(
                web::resource("/marks/{id}")
                    .route(web::put().to(update_mark))
                    .route(web::delete().to(delete_mark)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_exam))
                    .route(web::put().to(update_exam))
                    .route(web::delete().to(delete_exam)),
            ),
    );
}
