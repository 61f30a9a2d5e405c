use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::errors::TutoriaError;
use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::curriculum::entities::CurriculumLevel;
use crate::models::curriculum::requests::{
    CreateGlobalItemRequest, CreateNodeRequest, CreateSectionRequest, GlobalItemListParams,
    NodeListParams, SectionListParams, UpdateGlobalItemRequest, UpdateNodeRequest,
    UpdateSectionRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CurriculumService;
use crate::utils::SafeId;

static CURRICULUM_SERVICE: Lazy<CurriculumService> = Lazy::new(CurriculumService::new_lazy);

/// 路径中的层级名，未知层级返回 400
fn level_param(raw: &str) -> ActixResult<CurriculumLevel> {
    raw.parse::<CurriculumLevel>()
        .map_err(|e| TutoriaError::validation(e).into())
}

// 全局课程目录
pub async fn create_global_item(
    req: HttpRequest,
    level: web::Path<String>,
    body: web::Json<CreateGlobalItemRequest>,
) -> ActixResult<HttpResponse> {
    let level = level_param(&level)?;
    CURRICULUM_SERVICE
        .create_global_item(level, body.into_inner(), &req)
        .await
}

pub async fn list_global_items(
    req: HttpRequest,
    level: web::Path<String>,
    query: web::Query<GlobalItemListParams>,
) -> ActixResult<HttpResponse> {
    let level = level_param(&level)?;
    CURRICULUM_SERVICE
        .list_global_items(level, query.into_inner(), &req)
        .await
}

pub async fn get_global_item(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.get_global_item(path.0, &req).await
}

pub async fn update_global_item(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateGlobalItemRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .update_global_item(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_global_item(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.delete_global_item(path.0, &req).await
}

// 机构课程节点
pub async fn create_node(
    req: HttpRequest,
    level: web::Path<String>,
    body: web::Json<CreateNodeRequest>,
) -> ActixResult<HttpResponse> {
    let level = level_param(&level)?;
    CURRICULUM_SERVICE
        .create_node(level, body.into_inner(), &req)
        .await
}

pub async fn list_nodes(
    req: HttpRequest,
    level: web::Path<String>,
    query: web::Query<NodeListParams>,
) -> ActixResult<HttpResponse> {
    let level = level_param(&level)?;
    CURRICULUM_SERVICE
        .list_nodes(level, query.into_inner(), &req)
        .await
}

pub async fn get_node(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.get_node(path.0, &req).await
}

pub async fn update_node(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateNodeRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .update_node(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_node(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.delete_node(path.0, &req).await
}

// 分组
pub async fn create_section(
    req: HttpRequest,
    body: web::Json<CreateSectionRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .create_section(body.into_inner(), &req)
        .await
}

pub async fn list_sections(
    req: HttpRequest,
    query: web::Query<SectionListParams>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .list_sections(query.into_inner(), &req)
        .await
}

pub async fn get_section(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.get_section(path.0, &req).await
}

pub async fn update_section(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateSectionRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .update_section(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_section(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.delete_section(path.0, &req).await
}

pub async fn my_tracks(req: HttpRequest) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.my_tracks(&req).await
}

pub async fn my_sections(req: HttpRequest) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.my_sections(&req).await
}

pub async fn my_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.my_subjects(&req).await
}

// 配置路由
pub fn configure_curriculum_routes(cfg: &mut web::ServiceConfig) {
    let staff_only = || RequireRole::new_any(UserRole::admin_roles());

    cfg.service(
        web::scope("/api/v1/curriculum")
            .wrap(RequireJWT)
            // 全局目录：读取对所有登录用户开放，写入仅平台管理员
            .service(
                web::resource("/global/items/{id}")
                    .route(web::get().to(get_global_item))
                    .route(web::put().to(update_global_item).wrap(staff_only()))
                    .route(web::delete().to(delete_global_item).wrap(staff_only())),
            )
            .service(
                web::resource("/global/{level}")
                    .route(web::get().to(list_global_items))
                    .route(web::post().to(create_global_item).wrap(staff_only())),
            )
            .service(
                web::resource("/nodes/items/{id}")
                    .route(web::get().to(get_node))
                    .route(web::put().to(update_node))
                    .route(web::delete().to(delete_node)),
            )
            .service(
                web::resource("/nodes/{level}")
                    .route(web::get().to(list_nodes))
                    .route(web::post().to(create_node)),
            )
            .service(
                web::resource("/sections")
                    .route(web::get().to(list_sections))
                    .route(web::post().to(create_section)),
            )
            .service(
                web::resource("/sections/{id}")
                    .route(web::get().to(get_section))
                    .route(web::put().to(update_section))
                    .route(web::delete().to(delete_section)),
            )
            .route("/my/tracks", web::get().to(my_tracks))
            .route("/my/sections", web::get().to(my_sections))
            .route("/my/subjects", web::get().to(my_subjects)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_param() {
        assert_eq!(level_param("micro_lesson").unwrap(), CurriculumLevel::MicroLesson);
        assert!(level_param("chapter").is_err());
    }
}
