use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::attendance::requests::{
    AttendanceListParams, AttendanceStatsParams, BulkAttendanceRequest, CreateAttendanceRequest,
    UpdateAttendanceRequest,
};
use crate::services::AttendanceService;
use crate::utils::SafeId;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn create_attendance(
    req: HttpRequest,
    body: web::Json<CreateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_attendance(body.into_inner(), &req)
        .await
}

pub async fn bulk_create_attendance(
    req: HttpRequest,
    body: web::Json<BulkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .bulk_create_attendance(body.into_inner(), &req)
        .await
}

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendance(query.into_inner(), &req)
        .await
}

pub async fn get_attendance(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_attendance(path.0, &req).await
}

pub async fn update_attendance(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_attendance(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_attendance(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(path.0, &req).await
}

pub async fn attendance_statistics(
    req: HttpRequest,
    query: web::Query<AttendanceStatsParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.statistics(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_attendance))
                    .route(web::post().to(create_attendance)),
            )
            // 字面路径需在 {id} 之前注册
            .route("/bulk", web::post().to(bulk_create_attendance))
            .route("/statistics", web::get().to(attendance_statistics))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_attendance))
                    .route(web::put().to(update_attendance))
                    .route(web::delete().to(delete_attendance)),
            ),
    );
}
