//! 课程体系：全局目录、机构本地节点与分组

pub mod global;
pub mod mine;
pub mod nodes;
pub mod sections;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::curriculum::{
    entities::CurriculumLevel,
    requests::{
        CreateGlobalItemRequest, CreateNodeRequest, CreateSectionRequest, GlobalItemListParams,
        NodeListParams, SectionListParams, UpdateGlobalItemRequest, UpdateNodeRequest,
        UpdateSectionRequest,
    },
};

crate::services::define_service!(CurriculumService);

impl CurriculumService {
    // 全局目录
    pub async fn create_global_item(
        &self,
        level: CurriculumLevel,
        req: CreateGlobalItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        global::create_global_item(self, level, req, request).await
    }

    pub async fn list_global_items(
        &self,
        level: CurriculumLevel,
        params: GlobalItemListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        global::list_global_items(self, level, params, request).await
    }

    pub async fn get_global_item(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        global::get_global_item(self, id, request).await
    }

    pub async fn update_global_item(
        &self,
        id: String,
        update: UpdateGlobalItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        global::update_global_item(self, id, update, request).await
    }

    pub async fn delete_global_item(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        global::delete_global_item(self, id, request).await
    }

    // 本地节点
    pub async fn create_node(
        &self,
        level: CurriculumLevel,
        req: CreateNodeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        nodes::create_node(self, level, req, request).await
    }

    pub async fn list_nodes(
        &self,
        level: CurriculumLevel,
        params: NodeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        nodes::list_nodes(self, level, params, request).await
    }

    pub async fn get_node(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        nodes::get_node(self, id, request).await
    }

    pub async fn update_node(
        &self,
        id: String,
        update: UpdateNodeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        nodes::update_node(self, id, update, request).await
    }

    pub async fn delete_node(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        nodes::delete_node(self, id, request).await
    }

    // 分组
    pub async fn create_section(
        &self,
        req: CreateSectionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sections::create_section(self, req, request).await
    }

    pub async fn list_sections(
        &self,
        params: SectionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sections::list_sections(self, params, request).await
    }

    pub async fn get_section(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        sections::get_section(self, id, request).await
    }

    pub async fn update_section(
        &self,
        id: String,
        update: UpdateSectionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sections::update_section(self, id, update, request).await
    }

    pub async fn delete_section(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        sections::delete_section(self, id, request).await
    }

    // 当前用户可见
    pub async fn my_tracks(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_tracks(self, request).await
    }

    pub async fn my_sections(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_sections(self, request).await
    }

    pub async fn my_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_subjects(self, request).await
    }
}
