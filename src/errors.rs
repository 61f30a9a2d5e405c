//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称以及 HTTP 状态码映射。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tutoria_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TutoriaError {
            $($variant(String),)*
        }

        impl TutoriaError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TutoriaError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TutoriaError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TutoriaError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TutoriaError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TutoriaError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tutoria_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    StoragePluginNotFound("E010", "Storage Plugin Not Found"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Conflict"),
    Unprocessable("E015", "Unprocessable Entity"),
    ExternalService("E016", "External Service Error"),
    ServiceUnavailable("E017", "Service Unavailable"),
    RateLimited("E018", "Too Many Requests"),
    InternalServer("E019", "Internal Server Error"),
}

impl TutoriaError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            TutoriaError::Validation(_) | TutoriaError::DateParse(_) => StatusCode::BAD_REQUEST,
            TutoriaError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TutoriaError::Authorization(_) => StatusCode::FORBIDDEN,
            TutoriaError::NotFound(_) => StatusCode::NOT_FOUND,
            TutoriaError::Conflict(_) => StatusCode::CONFLICT,
            TutoriaError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TutoriaError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            TutoriaError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            TutoriaError::ServiceUnavailable(_) | TutoriaError::CacheConnection(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对应的业务错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            TutoriaError::Validation(_) | TutoriaError::DateParse(_) => ErrorCode::BadRequest,
            TutoriaError::Authentication(_) => ErrorCode::Unauthorized,
            TutoriaError::Authorization(_) => ErrorCode::Forbidden,
            TutoriaError::NotFound(_) => ErrorCode::NotFound,
            TutoriaError::Conflict(_) => ErrorCode::Conflict,
            TutoriaError::Unprocessable(_) => ErrorCode::Unprocessable,
            TutoriaError::RateLimited(_) => ErrorCode::RateLimitExceeded,
            TutoriaError::ExternalService(_) => ErrorCode::PaymentGatewayError,
            TutoriaError::ServiceUnavailable(_) | TutoriaError::CacheConnection(_) => {
                ErrorCode::ServiceUnavailable
            }
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for TutoriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TutoriaError {}

impl ResponseError for TutoriaError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.http_status();
        // 内部错误不向客户端暴露细节
        let message = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!("{}", self.format_simple());
            "Internal server error".to_string()
        } else {
            self.message().to_string()
        };
        HttpResponse::build(status).json(ApiResponse::error_empty(self.error_code(), message))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TutoriaError {
    fn from(err: sea_orm::DbErr) -> Self {
        TutoriaError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TutoriaError {
    fn from(err: std::io::Error) -> Self {
        TutoriaError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TutoriaError {
    fn from(err: serde_json::Error) -> Self {
        TutoriaError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TutoriaError {
    fn from(err: chrono::ParseError) -> Self {
        TutoriaError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for TutoriaError {
    fn from(err: reqwest::Error) -> Self {
        TutoriaError::ExternalService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TutoriaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TutoriaError::cache_connection("test").code(), "E001");
        assert_eq!(TutoriaError::database_config("test").code(), "E003");
        assert_eq!(TutoriaError::validation("test").code(), "E007");
        assert_eq!(TutoriaError::authentication("test").code(), "E012");
        assert_eq!(TutoriaError::rate_limited("test").code(), "E018");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            TutoriaError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            TutoriaError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = TutoriaError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = TutoriaError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            TutoriaError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TutoriaError::authorization("x").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TutoriaError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TutoriaError::unprocessable("x").http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            TutoriaError::service_unavailable("x").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            TutoriaError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let resp = TutoriaError::database_operation("secret table name").error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
