/*!
 * 基于角色的访问控制中间件
 *
 * 必须放在 RequireJWT 之后。用户的角色来自标志位，持有任一所需角色即放行。
 *
 * ```rust,ignore
 * web::scope("/api/v1/curriculum/global")
 *     .wrap(RequireJWT)
 *     .route("", web::post().to(create).wrap(RequireRole::new(UserRole::Admin)))
 * ```
 */

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::info;

use super::create_error_response;
use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Rc<[UserRole]>,
}

impl RequireRole {
    pub fn new(role: UserRole) -> Self {
        Self::new_any(&[role])
    }

    /// 任一角色即可
    pub fn new_any(roles: &[UserRole]) -> Self {
        Self {
            required_roles: roles.into(),
        }
    }
}

/// 拒绝时给出状态码、错误码与提示
type Denial = (StatusCode, ErrorCode, &'static str);

fn check(required: &[UserRole], user: Option<&User>) -> Result<(), Denial> {
    match user {
        Some(user) if user.has_any_role(required) => Ok(()),
        Some(user) => {
            info!(
                "User {} with roles {:?} lacks any of {:?}",
                user.id,
                user.roles(),
                required
            );
            Err((StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied."))
        }
        None => {
            info!("Role check reached without an authenticated user");
            Err((
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Authentication required",
            ))
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verdict = check(&self.required_roles, req.extensions().get::<User>());
        let srv = self.service.clone();

        Box::pin(async move {
            match verdict {
                Ok(()) => Ok(srv.call(req).await?.map_into_left_body()),
                Err((status, code, message)) => Ok(req.into_response(
                    create_error_response(status, code, message).map_into_right_body(),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::tests::sample_user;

    #[test]
    fn test_permits_any_listed_role() {
        let mut user = sample_user();
        user.is_institution = true;
        assert!(check(UserRole::institution_roles(), Some(&user)).is_ok());
        let (status, _, _) = check(UserRole::admin_roles(), Some(&user)).unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);

        user.is_staff = true;
        assert!(check(UserRole::admin_roles(), Some(&user)).is_ok());
    }

    #[test]
    fn test_missing_user_is_unauthorized() {
        let (status, code, _) = check(UserRole::admin_roles(), None).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, ErrorCode::Unauthorized);
    }
}
