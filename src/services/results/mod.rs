pub mod collect;
pub mod views;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::results::requests::{SectionResultsParams, StudentResultsParams};

crate::services::define_service!(ResultService);

impl ResultService {
    pub async fn student_results(
        &self,
        student_id: String,
        params: StudentResultsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        views::student_results(self, student_id, params, request).await
    }

    pub async fn section_results(
        &self,
        params: SectionResultsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        views::section_results(self, params, request).await
    }
}
