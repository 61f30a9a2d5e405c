//! 数据模型定义
//!
//! 业务实体、请求与响应结构体，以及统一响应封装。

pub mod common;

pub mod attendance;
pub mod auth;
pub mod curriculum;
pub mod enrollments;
pub mod exams;
pub mod fees;
pub mod homeworks;
pub mod institutions;
pub mod memberships;
pub mod notices;
pub mod payments;
pub mod quiz;
pub mod results;
pub mod scholarships;
pub mod syllabus;
pub mod users;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;
pub use common::validation::ValidationErrors;

/// 定义以字符串存储的枚举
///
/// 自动生成 serde 序列化名、`as_str()`、`Display` 与 `FromStr`。
#[macro_export]
macro_rules! define_str_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $s:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(#[serde(rename = $s)] $variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $s,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($name::$variant),)*
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }
    };
}

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    Unprocessable = 1022,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,
    ServiceUnavailable = 1503,

    // 认证与用户 2xxx
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserAlreadyExists = 2003,
    UserInactive = 2004,
    OtpInvalid = 2005,
    OtpCooldown = 2006,
    InvitationInvalid = 2007,
    AdmissionRequestInvalid = 2008,

    // 机构 3xxx
    InstitutionNotFound = 3000,
    InstitutionPermissionDenied = 3001,
    CurriculumInvalid = 3002,
    EnrollmentInvalid = 3003,

    // 教学业务 4xxx
    AttendanceInvalid = 4000,
    QuizNotAvailable = 4001,
    QuizAttemptInvalid = 4002,
    ExamInvalid = 4003,

    // 支付 5xxx
    FeeNotConfigured = 5000,
    PaymentDuplicate = 5001,
    PaymentGatewayError = 5002,
    PaymentAlreadyDisbursed = 5003,
}

/// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
