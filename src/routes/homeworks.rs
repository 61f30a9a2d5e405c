use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::homeworks::requests::{
    CreateHomeworkRequest, HomeworkListParams, MarkSubmissionRequest, SubmissionListParams,
    UpdateHomeworkRequest,
};
use crate::services::HomeworkService;
use crate::utils::SafeId;

// 懒加载的全局 HomeworkService 实例
static HOMEWORK_SERVICE: Lazy<HomeworkService> = Lazy::new(HomeworkService::new_lazy);

pub async fn list_homeworks(
    req: HttpRequest,
    query: web::Query<HomeworkListParams>,
) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE
        .list_homeworks(query.into_inner(), &req)
        .await
}

pub async fn create_homework(
    req: HttpRequest,
    body: web::Json<CreateHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE
        .create_homework(body.into_inner(), &req)
        .await
}

pub async fn get_homework(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE.get_homework(path.0, &req).await
}

pub async fn update_homework(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE
        .update_homework(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_homework(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE.delete_homework(path.0, &req).await
}

// 教师登记提交情况
pub async fn mark_submission(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<MarkSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE
        .mark_submission(path.0, body.into_inner(), &req)
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    path: SafeId,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    HOMEWORK_SERVICE
        .list_submissions(path.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_homework_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/homeworks")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    // 业务层按角色过滤
                    .route(web::get().to(list_homeworks))
                    .route(web::post().to(create_homework)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_homework))
                    .route(web::put().to(update_homework))
                    .route(web::delete().to(delete_homework)),
            )
            .service(
                web::resource("/{id}/submissions")
                    .route(web::get().to(list_submissions))
                    .route(web::post().to(mark_submission)),
            ),
    );
}
