pub mod create;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::institutions::requests::{CreateInstitutionRequest, UpdateInstitutionRequest};

crate::services::define_service!(InstitutionService);

impl InstitutionService {
    pub async fn create_institution(
        &self,
        req: CreateInstitutionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_institution(self, req, request).await
    }

    pub async fn list_institutions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_institutions(self, request).await
    }

    pub async fn my_institution(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::my_institution(self, request).await
    }

    pub async fn get_institution(
        &self,
        institution_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_institution(self, institution_id, request).await
    }

    pub async fn update_institution(
        &self,
        institution_id: String,
        update: UpdateInstitutionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_institution(self, institution_id, update, request).await
    }
}
