//! bKash 令牌化收银台客户端
//!
//! 令牌缓存在应用缓存中，过期前复用。

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use ts_rs::TS;

use crate::cache::ObjectCache;
use crate::config::{AppConfig, BkashConfig};
use crate::errors::{Result, TutoriaError};

const TOKEN_CACHE_KEY: &str = "bkash:id_token";
const SUCCESS_CODE: &str = "0000";

#[derive(Debug, Serialize)]
struct GrantTokenBody<'a> {
    app_key: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct GrantTokenReply {
    id_token: Option<String>,
    #[serde(rename = "statusMessage")]
    status_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentBody<'a> {
    mode: &'a str,
    payer_reference: &'a str,
    #[serde(rename = "callbackURL")]
    callback_url: &'a str,
    amount: String,
    currency: &'a str,
    intent: &'a str,
    merchant_invoice_number: &'a str,
}

#[derive(Debug, Serialize)]
struct PaymentIdBody<'a> {
    #[serde(rename = "paymentID")]
    payment_id: &'a str,
}

/// 创建支付的网关结果
#[derive(Debug, Clone)]
pub struct CreatedPayment {
    pub payment_id: String,
    pub bkash_url: String,
}

/// 网关返回的支付状态，执行与查询共用
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct GatewayPaymentStatus {
    #[serde(rename = "statusCode")]
    pub status_code: Option<String>,
    #[serde(rename = "statusMessage")]
    pub status_message: Option<String>,
    #[serde(rename = "paymentID")]
    pub payment_id: Option<String>,
    #[serde(rename = "trxID")]
    pub trx_id: Option<String>,
    #[serde(rename = "transactionStatus")]
    pub transaction_status: Option<String>,
    pub amount: Option<String>,
    #[serde(rename = "merchantInvoiceNumber")]
    pub merchant_invoice_number: Option<String>,
}

impl GatewayPaymentStatus {
    pub fn is_completed(&self) -> bool {
        self.transaction_status.as_deref() == Some("Completed")
    }
}

#[derive(Debug, Deserialize)]
struct CreatePaymentReply {
    #[serde(rename = "statusCode")]
    status_code: Option<String>,
    #[serde(rename = "statusMessage")]
    status_message: Option<String>,
    #[serde(rename = "paymentID")]
    payment_id: Option<String>,
    #[serde(rename = "bkashURL")]
    bkash_url: Option<String>,
}

/// 解析创建支付的应答，`statusCode` 必须为 `0000`
fn created_from_reply(reply: CreatePaymentReply) -> Result<CreatedPayment> {
    match reply {
        CreatePaymentReply {
            status_code: Some(code),
            payment_id: Some(payment_id),
            bkash_url: Some(bkash_url),
            ..
        } if code == SUCCESS_CODE => Ok(CreatedPayment {
            payment_id,
            bkash_url,
        }),
        reply => Err(TutoriaError::external_service(format!(
            "Payment creation failed: {}",
            reply
                .status_message
                .or(reply.status_code)
                .unwrap_or_else(|| "unknown gateway error".to_string())
        ))),
    }
}

pub struct BkashClient {
    http: reqwest::Client,
    config: &'static BkashConfig,
    cache: Arc<dyn ObjectCache>,
}

impl BkashClient {
    pub fn new(cache: Arc<dyn ObjectCache>) -> Result<Self> {
        let config = &AppConfig::get().bkash;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            cache,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// 获取授权令牌，失败时返回 503
    pub async fn grant_token(&self) -> Result<String> {
        if let Some(token) = self.cache.get_raw(TOKEN_CACHE_KEY).await.into_option() {
            return Ok(token);
        }

        let reply: GrantTokenReply = self
            .http
            .post(self.url("/tokenized/checkout/token/grant"))
            .header("username", &self.config.username)
            .header("password", &self.config.password)
            .json(&GrantTokenBody {
                app_key: &self.config.app_key,
                app_secret: &self.config.app_secret,
            })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                error!("bKash token request failed: {}", e);
                TutoriaError::service_unavailable("Payment gateway is unavailable")
            })?
            .json()
            .await
            .map_err(|e| {
                error!("bKash token response malformed: {}", e);
                TutoriaError::service_unavailable("Payment gateway is unavailable")
            })?;

        let Some(token) = reply.id_token else {
            warn!(
                "bKash token grant rejected: {}",
                reply.status_message.unwrap_or_default()
            );
            return Err(TutoriaError::service_unavailable(
                "Failed to obtain payment gateway token",
            ));
        };

        self.cache
            .insert_raw(
                TOKEN_CACHE_KEY.to_string(),
                token.clone(),
                self.config.token_ttl_secs,
            )
            .await;
        info!("bKash token granted");
        Ok(token)
    }

    async fn post_authorized<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let token = self.grant_token().await?;
        let reply = self
            .http
            .post(self.url(path))
            .header("authorization", token)
            .header("x-app-key", &self.config.app_key)
            .json(body)
            .send()
            .await?
            .json()
            .await?;
        Ok(reply)
    }

    pub async fn create_payment(&self, amount: Decimal, invoice: &str) -> Result<CreatedPayment> {
        let body = CreatePaymentBody {
            mode: "0011",
            payer_reference: " ",
            callback_url: &self.config.callback_url,
            amount: amount.round_dp(2).to_string(),
            currency: "BDT",
            intent: "sale",
            merchant_invoice_number: invoice,
        };
        let reply: CreatePaymentReply = self
            .post_authorized("/tokenized/checkout/create", &body)
            .await?;
        let created = created_from_reply(reply)?;
        info!("bKash payment {} created for {}", created.payment_id, invoice);
        Ok(created)
    }

    pub async fn execute_payment(&self, payment_id: &str) -> Result<GatewayPaymentStatus> {
        self.post_authorized("/tokenized/checkout/execute", &PaymentIdBody { payment_id })
            .await
    }

    pub async fn query_payment(&self, payment_id: &str) -> Result<GatewayPaymentStatus> {
        self.post_authorized(
            "/tokenized/checkout/payment/status",
            &PaymentIdBody { payment_id },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(code: Option<&str>, id: Option<&str>) -> CreatePaymentReply {
        CreatePaymentReply {
            status_code: code.map(str::to_string),
            status_message: Some("Invalid amount".to_string()),
            payment_id: id.map(str::to_string),
            bkash_url: id.map(|_| "https://pay.example/checkout".to_string()),
        }
    }

    #[test]
    fn test_create_requires_success_code() {
        let created = created_from_reply(reply(Some("0000"), Some("TR001"))).unwrap();
        assert_eq!(created.payment_id, "TR001");

        let err = created_from_reply(reply(Some("2001"), Some("TR001"))).unwrap_err();
        assert!(matches!(err, TutoriaError::ExternalService(_)));
        assert!(err.message().contains("Invalid amount"));

        assert!(created_from_reply(reply(Some("0000"), None)).is_err());
    }

    #[test]
    fn test_status_payload_field_names() {
        let status: GatewayPaymentStatus = serde_json::from_str(
            r#"{"statusCode":"0000","paymentID":"TR001","trxID":"ABC123","transactionStatus":"Completed"}"#,
        )
        .unwrap();
        assert!(status.is_completed());
        assert_eq!(status.trx_id.as_deref(), Some("ABC123"));

        let pending = GatewayPaymentStatus {
            transaction_status: Some("Initiated".to_string()),
            ..Default::default()
        };
        assert!(!pending.is_completed());
    }
}
