use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::syllabus::requests::{
    CreateSyllabusRequest, SyllabusListParams, UpdateSyllabusRequest,
};
use crate::services::SyllabusService;
use crate::utils::SafeId;

static SYLLABUS_SERVICE: Lazy<SyllabusService> = Lazy::new(SyllabusService::new_lazy);

pub async fn create_syllabus(
    req: HttpRequest,
    body: web::Json<CreateSyllabusRequest>,
) -> ActixResult<HttpResponse> {
    SYLLABUS_SERVICE
        .create_syllabus(body.into_inner(), &req)
        .await
}

pub async fn list_syllabi(
    req: HttpRequest,
    query: web::Query<SyllabusListParams>,
) -> ActixResult<HttpResponse> {
    SYLLABUS_SERVICE.list_syllabi(query.into_inner(), &req).await
}

pub async fn get_syllabus(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    SYLLABUS_SERVICE.get_syllabus(path.0, &req).await
}

pub async fn update_syllabus(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateSyllabusRequest>,
) -> ActixResult<HttpResponse> {
    SYLLABUS_SERVICE
        .update_syllabus(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_syllabus(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    SYLLABUS_SERVICE.delete_syllabus(path.0, &req).await
}

// 配置路由
pub fn configure_syllabus_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/syllabus")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_syllabi))
                    .route(web::post().to(create_syllabus)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_syllabus))
                    .route(web::put().to(update_syllabus))
                    .route(web::delete().to(delete_syllabus)),
            ),
    );
}
