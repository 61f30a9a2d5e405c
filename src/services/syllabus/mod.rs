pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::syllabus::requests::{
    CreateSyllabusRequest, SyllabusListParams, UpdateSyllabusRequest,
};

crate::services::define_service!(SyllabusService);

impl SyllabusService {
    pub async fn create_syllabus(
        &self,
        req: CreateSyllabusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_syllabus(self, req, request).await
    }

    pub async fn list_syllabi(
        &self,
        params: SyllabusListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_syllabi(self, params, request).await
    }

    pub async fn get_syllabus(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_syllabus(self, id, request).await
    }

    pub async fn update_syllabus(
        &self,
        id: String,
        update: UpdateSyllabusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_syllabus(self, id, update, request).await
    }

    pub async fn delete_syllabus(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_syllabus(self, id, request).await
    }
}
