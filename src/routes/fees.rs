use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::fees::requests::{CreateFeeRequest, FeeListParams, UpdateFeeRequest};
use crate::models::scholarships::requests::{
    CreateScholarshipRequest, ScholarshipListParams, UpdateScholarshipRequest,
};
use crate::services::{FeeService, ScholarshipService};
use crate::utils::SafeId;

static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);
static SCHOLARSHIP_SERVICE: Lazy<ScholarshipService> = Lazy::new(ScholarshipService::new_lazy);

pub async fn create_fee(
    req: HttpRequest,
    body: web::Json<CreateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_fee(body.into_inner(), &req).await
}

pub async fn list_fees(
    req: HttpRequest,
    query: web::Query<FeeListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fees(query.into_inner(), &req).await
}

pub async fn get_fee(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_fee(path.0, &req).await
}

pub async fn update_fee(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.update_fee(path.0, body.into_inner(), &req).await
}

pub async fn delete_fee(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_fee(path.0, &req).await
}

// 某个学生注册的应缴学费
pub async fn enrollment_fee(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    FEE_SERVICE.enrollment_fee(path.0, &req).await
}

pub async fn create_scholarship(
    req: HttpRequest,
    body: web::Json<CreateScholarshipRequest>,
) -> ActixResult<HttpResponse> {
    SCHOLARSHIP_SERVICE
        .create_scholarship(body.into_inner(), &req)
        .await
}

pub async fn list_scholarships(
    req: HttpRequest,
    query: web::Query<ScholarshipListParams>,
) -> ActixResult<HttpResponse> {
    SCHOLARSHIP_SERVICE
        .list_scholarships(query.into_inner(), &req)
        .await
}

pub async fn get_scholarship(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    SCHOLARSHIP_SERVICE.get_scholarship(path.0, &req).await
}

pub async fn update_scholarship(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateScholarshipRequest>,
) -> ActixResult<HttpResponse> {
    SCHOLARSHIP_SERVICE
        .update_scholarship(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_scholarship(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    SCHOLARSHIP_SERVICE.delete_scholarship(path.0, &req).await
}

// 配置路由
pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_fees))
                    .route(web::post().to(create_fee)),
            )
            .route("/enrollments/{id}", web::get().to(enrollment_fee))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_fee))
                    .route(web::put().to(update_fee))
                    .route(web::delete().to(delete_fee)),
            ),
    );
}

pub fn configure_scholarship_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/scholarships")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_scholarships))
                    .route(web::post().to(create_scholarship)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_scholarship))
                    .route(web::put().to(update_scholarship))
                    .route(web::delete().to(delete_scholarship)),
            ),
    );
}
