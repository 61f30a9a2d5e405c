use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::institutions::requests::{CreateInstitutionRequest, UpdateInstitutionRequest};
use crate::models::users::entities::UserRole;
use crate::services::InstitutionService;
use crate::utils::SafeId;

static INSTITUTION_SERVICE: Lazy<InstitutionService> = Lazy::new(InstitutionService::new_lazy);

pub async fn create_institution(
    req: HttpRequest,
    body: web::Json<CreateInstitutionRequest>,
) -> ActixResult<HttpResponse> {
    INSTITUTION_SERVICE
        .create_institution(body.into_inner(), &req)
        .await
}

pub async fn list_institutions(req: HttpRequest) -> ActixResult<HttpResponse> {
    INSTITUTION_SERVICE.list_institutions(&req).await
}

pub async fn my_institution(req: HttpRequest) -> ActixResult<HttpResponse> {
    INSTITUTION_SERVICE.my_institution(&req).await
}

pub async fn get_institution(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    INSTITUTION_SERVICE.get_institution(path.0, &req).await
}

pub async fn update_institution(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateInstitutionRequest>,
) -> ActixResult<HttpResponse> {
    INSTITUTION_SERVICE
        .update_institution(path.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_institution_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/institutions")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_institutions))
                    .route(
                        web::post()
                            .to(create_institution)
                            .wrap(RequireRole::new_any(UserRole::institution_roles())),
                    ),
            )
            .route("/mine", web::get().to(my_institution))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_institution))
                    .route(web::put().to(update_institution)),
            ),
    );
}
