use serde::Deserialize;
use ts_rs::TS;

// 注册请求，邮箱与手机号二选一
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: String,
    /// `institution` 注册机构账号，其余为入学申请者
    pub role: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct VerifyOtpRequest {
    /// 邮箱或手机号
    pub identifier: String,
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct CheckUserRequest {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginRequest {
    /// 邮箱或手机号
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct RefreshTokenRequest {
    /// 缺省时从 Cookie 读取
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct ForgotPasswordRequest {
    pub identifier: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct ResetPasswordRequest {
    pub identifier: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}
