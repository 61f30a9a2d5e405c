/*!
 * 认证端点的固定窗口限流
 *
 * 计数键为 `端点:客户端`，客户端优先取已认证用户，其次取来源 IP。
 * 超限返回 429，并带 `Retry-After` 头。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login));
 * ```
 */

use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 窗口起点与窗口内计数
#[derive(Clone, Copy)]
struct Bucket {
    started: Instant,
    hits: u32,
}

// 最长窗口为 60 秒，过期时间取其两倍
static BUCKETS: Lazy<Cache<String, Bucket>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(120))
        .max_capacity(100_000)
        .build()
});

const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

#[derive(Clone)]
pub struct RateLimit {
    endpoint: &'static str,
    max_requests: u32,
    window: Duration,
}

impl RateLimit {
    pub const fn new(endpoint: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            endpoint,
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub const fn login() -> Self {
        Self::new("login", 5, 60)
    }

    pub const fn register() -> Self {
        Self::new("register", 3, 60)
    }

    pub const fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    /// 验证码校验与重发
    pub const fn otp() -> Self {
        Self::new("otp", 5, 60)
    }

    /// 找回与重置密码共用
    pub const fn password_reset() -> Self {
        Self::new("password_reset", 3, 60)
    }
}

/// 判定结果：放行时携带剩余次数，拒绝时携带需等待的秒数
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

async fn hit(key: String, max_requests: u32, window: Duration) -> Verdict {
    let now = Instant::now();
    let bucket = match BUCKETS.get(&key).await {
        Some(b) if now.duration_since(b.started) < window => b,
        _ => Bucket {
            started: now,
            hits: 0,
        },
    };

    if bucket.hits >= max_requests {
        let elapsed = now.duration_since(bucket.started);
        let retry_after = window.saturating_sub(elapsed).as_secs().max(1);
        return Verdict::Limited { retry_after };
    }

    let hits = bucket.hits + 1;
    BUCKETS.insert(key, Bucket { hits, ..bucket }).await;
    Verdict::Allowed {
        remaining: max_requests - hits,
    }
}

/// 只接受能解析为 IP 的来源，代理头由 actix 的 realip 规则处理
fn client_key(req: &ServiceRequest) -> String {
    if let Some(user) = req.extensions().get::<User>() {
        return format!("user:{}", user.id);
    }
    let info = req.connection_info();
    let ip = info
        .realip_remote_addr()
        .and_then(|addr| strip_port(addr).parse::<IpAddr>().ok());
    match ip {
        Some(ip) => format!("ip:{ip}"),
        None => "ip:unknown".to_string(),
    }
}

fn strip_port(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match addr.rsplit_once(':') {
        // 仅一个冒号时才是 host:port，IPv6 原样返回
        Some((host, _)) if !host.contains(':') => host,
        _ => addr,
    }
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header((REMAINING_HEADER, "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = format!("{}:{}", limit.endpoint, client_key(&req));
            match hit(key.clone(), limit.max_requests, limit.window).await {
                Verdict::Limited { retry_after } => {
                    warn!("Rate limit hit for {} (max {})", key, limit.max_requests);
                    Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()))
                }
                Verdict::Allowed { remaining } => {
                    let mut res = srv.call(req).await?;
                    res.headers_mut()
                        .insert(REMAINING_HEADER, HeaderValue::from(remaining));
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};

    #[::core::prelude::v1::test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.endpoint, login.max_requests), ("login", 5));
        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::password_reset().window, Duration::from_secs(60));
    }

    #[::core::prelude::v1::test]
    fn test_strip_port() {
        assert_eq!(strip_port("10.0.0.1:5555"), "10.0.0.1");
        assert_eq!(strip_port("[::1]:8080"), "::1");
        assert_eq!(strip_port("::1"), "::1");
        assert_eq!(strip_port("10.0.0.1"), "10.0.0.1");
    }

    #[tokio::test]
    async fn test_hit_counts_down_then_limits() {
        let window = Duration::from_secs(60);
        let key = "test:otp:ip:10.9.0.1".to_string();
        assert_eq!(hit(key.clone(), 2, window).await, Verdict::Allowed { remaining: 1 });
        assert_eq!(hit(key.clone(), 2, window).await, Verdict::Allowed { remaining: 0 });
        assert!(matches!(hit(key, 2, window).await, Verdict::Limited { .. }));
        assert_eq!(
            hit("test:otp:ip:10.9.0.2".to_string(), 2, window).await,
            Verdict::Allowed { remaining: 1 }
        );
    }

    #[tokio::test]
    async fn test_expired_window_resets() {
        let key = "test:reset:ip:10.9.0.3".to_string();
        let window = Duration::from_millis(20);
        assert_eq!(hit(key.clone(), 1, window).await, Verdict::Allowed { remaining: 0 });
        assert!(matches!(hit(key.clone(), 1, window).await, Verdict::Limited { .. }));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(hit(key, 1, window).await, Verdict::Allowed { remaining: 0 });
    }

    #[actix_web::test]
    async fn test_middleware_returns_429() {
        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new("mw-test", 1, 60))
                    .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let addr = "10.9.0.9:4000".parse().unwrap();
        let first = test::call_service(
            &app,
            test::TestRequest::get().uri("/limited").peer_addr(addr).to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers().get("x-ratelimit-remaining").unwrap(), "0");

        let second = test::call_service(
            &app,
            test::TestRequest::get().uri("/limited").peer_addr(addr).to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key("retry-after"));
    }
}
