use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::notices::requests::{CreateNoticeRequest, NoticeListParams, UpdateNoticeRequest};
use crate::services::NoticeService;
use crate::utils::SafeId;

static NOTICE_SERVICE: Lazy<NoticeService> = Lazy::new(NoticeService::new_lazy);

pub async fn create_notice(
    req: HttpRequest,
    body: web::Json<CreateNoticeRequest>,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.create_notice(body.into_inner(), &req).await
}

pub async fn list_notices(
    req: HttpRequest,
    query: web::Query<NoticeListParams>,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.list_notices(query.into_inner(), &req).await
}

pub async fn get_notice(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.get_notice(path.0, &req).await
}

pub async fn update_notice(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateNoticeRequest>,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE
        .update_notice(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_notice(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.delete_notice(path.0, &req).await
}

// 配置路由
pub fn configure_notice_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notices")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_notices))
                    .route(web::post().to(create_notice)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_notice))
                    .route(web::put().to(update_notice))
                    .route(web::delete().to(delete_notice)),
            ),
    );
}
