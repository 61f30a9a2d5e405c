pub mod manage;
pub mod resolve;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::fees::requests::{CreateFeeRequest, FeeListParams, UpdateFeeRequest};

pub use resolve::{quote_for_enrollment, resolve_fee};

crate::services::define_service!(FeeService);

impl FeeService {
    pub async fn create_fee(&self, req: CreateFeeRequest, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::create_fee(self, req, request).await
    }

    pub async fn list_fees(&self, params: FeeListParams, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::list_fees(self, params, request).await
    }

    pub async fn get_fee(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_fee(self, id, request).await
    }

    pub async fn update_fee(
        &self,
        id: String,
        req: UpdateFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_fee(self, id, req, request).await
    }

    pub async fn delete_fee(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_fee(self, id, request).await
    }

    pub async fn enrollment_fee(
        &self,
        enrollment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        resolve::enrollment_fee(self, enrollment_id, request).await
    }
}
