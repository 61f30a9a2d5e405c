pub mod login;
pub mod otp;
pub mod password;
pub mod profile;
pub mod register;
pub mod token;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::auth::requests::{
    ChangePasswordRequest, CheckUserRequest, ForgotPasswordRequest, LoginRequest,
    RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, VerifyOtpRequest,
};
use crate::models::users::{entities::User, requests::UpdateProfileRequest};
use crate::storage::Storage;
use crate::utils::validate::Identifier;

crate::services::define_service!(AuthService);

impl AuthService {
    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn register(
        &self,
        req: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, req, request).await
    }

    pub async fn verify_otp(
        &self,
        req: VerifyOtpRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        otp::handle_verify_otp(self, req, request).await
    }

    pub async fn check_user(
        &self,
        req: CheckUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        otp::handle_check_user(self, req, request).await
    }

    pub async fn login(&self, req: LoginRequest, request: &HttpRequest) -> ActixResult<HttpResponse> {
        login::handle_login(self, req, request).await
    }

    pub async fn refresh_token(
        &self,
        req: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, req, request).await
    }

    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_logout(self, request).await
    }

    pub async fn forgot_password(
        &self,
        req: ForgotPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_forgot_password(self, req, request).await
    }

    pub async fn reset_password(
        &self,
        req: ResetPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_reset_password(self, req, request).await
    }

    pub async fn change_password(
        &self,
        req: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_password(self, req, request).await
    }

    pub async fn get_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_get_profile(self, request).await
    }

    pub async fn update_profile(
        &self,
        req: UpdateProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_update_profile(self, req, request).await
    }
}

/// 按邮箱或手机号查找用户
pub(crate) async fn find_by_identifier(
    storage: &Arc<dyn Storage>,
    identifier: &Identifier,
) -> Result<Option<User>> {
    match identifier {
        Identifier::Email(email) => storage.get_user_by_email(email).await,
        Identifier::Phone(phone) => storage.get_user_by_phone(phone).await,
    }
}
