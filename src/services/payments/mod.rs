pub mod bkash;
pub mod fees;
pub mod trackers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::payments::requests::{
    CreateFeePaymentRequest, FeePaymentListParams, TrackerListParams,
};

crate::services::define_service!(PaymentService);

impl PaymentService {
    pub async fn create_fee_payment(
        &self,
        req: CreateFeePaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fees::create_fee_payment(self, req, request).await
    }

    pub async fn list_fee_payments(
        &self,
        params: FeePaymentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fees::list_fee_payments(self, params, request).await
    }

    pub async fn get_fee_payment(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        fees::get_fee_payment(self, id, request).await
    }

    pub async fn execute_payment(
        &self,
        payment_id: String,
        callback_status: Option<String>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fees::execute_payment(self, payment_id, callback_status, request).await
    }

    pub async fn query_payment(
        &self,
        payment_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        fees::query_payment(self, payment_id, request).await
    }

    pub async fn list_trackers(
        &self,
        params: TrackerListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        trackers::list_trackers(self, params, request).await
    }

    pub async fn get_tracker(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        trackers::get_tracker(self, id, request).await
    }

    pub async fn disburse_tracker(
        &self,
        id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        trackers::disburse_tracker(self, id, request).await
    }
}
