use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::payments::requests::{
    BkashCallbackParams, CreateFeePaymentRequest, ExecutePaymentRequest, FeePaymentListParams,
    QueryPaymentParams, TrackerListParams,
};
use crate::services::PaymentService;
use crate::utils::SafeId;

static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn create_fee_payment(
    req: HttpRequest,
    body: web::Json<CreateFeePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .create_fee_payment(body.into_inner(), &req)
        .await
}

pub async fn list_fee_payments(
    req: HttpRequest,
    query: web::Query<FeePaymentListParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .list_fee_payments(query.into_inner(), &req)
        .await
}

pub async fn get_fee_payment(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.get_fee_payment(path.0, &req).await
}

// bKash 支付完成后重定向回调，不携带令牌
pub async fn bkash_callback(
    req: HttpRequest,
    query: web::Query<BkashCallbackParams>,
) -> ActixResult<HttpResponse> {
    let params = query.into_inner();
    PAYMENT_SERVICE
        .execute_payment(params.payment_id, params.status, &req)
        .await
}

pub async fn execute_payment(
    req: HttpRequest,
    body: web::Json<ExecutePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .execute_payment(body.into_inner().payment_id, None, &req)
        .await
}

pub async fn query_payment(
    req: HttpRequest,
    query: web::Query<QueryPaymentParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .query_payment(query.into_inner().payment_id, &req)
        .await
}

pub async fn list_trackers(
    req: HttpRequest,
    query: web::Query<TrackerListParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_trackers(query.into_inner(), &req).await
}

pub async fn get_tracker(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.get_tracker(path.0, &req).await
}

pub async fn disburse_tracker(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.disburse_tracker(path.0, &req).await
}

// 配置路由
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/payments")
            .route("/bkash/callback", web::get().to(bkash_callback))
            .service(
                web::scope("")
                    .wrap(RequireJWT)
                    .service(
                        web::resource("/fees")
                            .route(web::get().to(list_fee_payments))
                            .route(web::post().to(create_fee_payment)),
                    )
                    .route("/fees/{id}", web::get().to(get_fee_payment))
                    .route("/execute", web::post().to(execute_payment))
                    .route("/query", web::get().to(query_payment))
                    .route("/trackers", web::get().to(list_trackers))
                    .route("/trackers/{id}", web::get().to(get_tracker))
                    .route("/trackers/{id}/disburse", web::post().to(disburse_tracker)),
            ),
    );
}
