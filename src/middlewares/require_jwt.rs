/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access token>`，通过后把当前用户写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/notices")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_notices))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_user_claims(&req)` 读取用户。
 * 用户信息按 id 缓存在 `user:{id}`，资料、密码或角色变更后由处理函数删除。
 */

use std::{rc::Rc, sync::Arc};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info};

use super::create_error_response;
use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 缓存中的用户键
pub fn user_cache_key(user_id: &str) -> String {
    format!("user:{user_id}")
}

/// 删除缓存的用户，下次请求回库读取
pub async fn invalidate_cached_user(cache: &Arc<dyn ObjectCache>, user_id: &str) {
    cache.remove(&user_cache_key(user_id)).await;
    debug!("Cached user {} invalidated", user_id);
}

/// 读取请求头中的 bearer token
pub fn bearer_token(headers: &actix_web::http::header::HeaderMap) -> Option<&str> {
    headers
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<User, String> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Cache not configured".to_string())?;

    let key = user_cache_key(&claims.sub);
    if let CacheResult::Found(json) = cache.get_raw(&key).await {
        match serde_json::from_str::<User>(&json) {
            Ok(user) if user.id == claims.sub => return Ok(user),
            _ => cache.remove(&key).await,
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Storage not configured".to_string())?;

    let user = storage
        .get_user_by_id(&claims.sub)
        .await
        .map_err(|_| "Failed to retrieve user from storage".to_string())?
        .ok_or_else(|| "User not found".to_string())?;

    if !user.is_active {
        return Err("User is not active".to_string());
    }

    if let Ok(user_json) = serde_json::to_string(&user) {
        cache
            .insert_raw(key, user_json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行给 CORS 处理
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前登录用户
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<String> {
        req.extensions().get::<User>().map(|user| user.id.clone())
    }

    /// 主角色（优先级最高的一个）
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions()
            .get::<User>()
            .and_then(|user| user.primary_role())
    }

    pub fn has_any_role(req: &actix_web::HttpRequest, roles: &[UserRole]) -> bool {
        req.extensions()
            .get::<User>()
            .is_some_and(|user| user.has_any_role(roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(req.headers()), Some("abc.def"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(req.headers()), None);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert_eq!(bearer_token(req.headers()), None);
    }

    #[tokio::test]
    async fn test_invalidate_cached_user_removes_entry() {
        use crate::cache::object_cache::moka::MokaCacheWrapper;

        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
        cache
            .insert_raw(user_cache_key("u-1"), "{}".to_string(), 60)
            .await;
        cache
            .insert_raw(user_cache_key("u-2"), "{}".to_string(), 60)
            .await;

        invalidate_cached_user(&cache, "u-1").await;
        assert!(!cache.contains("user:u-1").await);
        assert!(cache.contains("user:u-2").await);
    }

    #[test]
    fn test_extract_user_from_extensions() {
        let req = TestRequest::default().to_http_request();
        assert!(RequireJWT::extract_user_id(&req).is_none());

        let mut user = crate::models::users::entities::tests::sample_user();
        user.is_teacher = true;
        req.extensions_mut().insert(user);
        assert_eq!(RequireJWT::extract_user_id(&req).as_deref(), Some("u-1"));
        assert_eq!(RequireJWT::extract_user_role(&req), Some(UserRole::Teacher));
        assert!(RequireJWT::has_any_role(&req, UserRole::teaching_roles()));
        assert!(!RequireJWT::has_any_role(&req, UserRole::admin_roles()));
    }

    #[actix_web::test]
    async fn test_cached_user_refreshes_after_invalidation() {
        use actix_web::{App, HttpRequest, HttpResponse, test};

        use crate::cache::object_cache::moka::MokaCacheWrapper;
        use crate::models::users::requests::{NewUser, UpdateProfileRequest};
        use crate::storage::sea_orm_storage::SeaOrmStorage;

        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
        let user = storage
            .create_user(NewUser {
                email: Some("cached@example.com".to_string()),
                first_name: "Old".to_string(),
                is_active: true,
                is_admission_seeker: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let token = user.generate_token_pair().unwrap().access_token;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(cache.clone()))
                .service(web::resource("/me").wrap(RequireJWT).to(
                    |req: HttpRequest| async move {
                        let name = RequireJWT::extract_user_claims(&req)
                            .map(|u| u.first_name)
                            .unwrap_or_default();
                        HttpResponse::Ok().body(name)
                    },
                )),
        )
        .await;
        let call = || {
            test::TestRequest::get()
                .uri("/me")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request()
        };

        let body = test::call_and_read_body(&app, call()).await;
        assert_eq!(body, "Old");
        assert!(cache.contains(&user_cache_key(&user.id)).await);

        storage
            .update_profile(
                &user.id,
                UpdateProfileRequest {
                    first_name: Some("New".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(test::call_and_read_body(&app, call()).await, "Old");

        invalidate_cached_user(&cache, &user.id).await;
        assert_eq!(test::call_and_read_body(&app, call()).await, "New");
    }
}
