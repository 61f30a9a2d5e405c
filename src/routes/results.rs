use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::results::requests::{SectionResultsParams, StudentResultsParams};
use crate::services::ResultService;
use crate::utils::SafeStudentId;

static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

pub async fn student_results(
    req: HttpRequest,
    path: SafeStudentId,
    query: web::Query<StudentResultsParams>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .student_results(path.0, query.into_inner(), &req)
        .await
}

pub async fn section_results(
    req: HttpRequest,
    query: web::Query<SectionResultsParams>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .section_results(query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_result_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/results")
            .wrap(RequireJWT)
            .route("/sections", web::get().to(section_results))
            .route("/students/{student_id}", web::get().to(student_results)),
    );
}
