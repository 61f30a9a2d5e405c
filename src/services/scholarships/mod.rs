pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::scholarships::requests::{
    CreateScholarshipRequest, ScholarshipListParams, UpdateScholarshipRequest,
};

crate::services::define_service!(ScholarshipService);

impl ScholarshipService {
    pub async fn create_scholarship(
        &self,
        req: CreateScholarshipRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_scholarship(self, req, request).await
    }

    pub async fn list_scholarships(
        &self,
        params: ScholarshipListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_scholarships(self, params, request).await
    }

    pub async fn get_scholarship(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_scholarship(self, id, request).await
    }

    pub async fn update_scholarship(
        &self,
        id: String,
        req: UpdateScholarshipRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_scholarship(self, id, req, request).await
    }

    pub async fn delete_scholarship(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_scholarship(self, id, request).await
    }
}
