//! 路径参数安全提取器
//!
//! 校验路径中的 UUID 参数，非法时直接返回 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(name: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid or missing path parameter '{name}', expected a UUID"),
    ));
    InternalError::from_response(format!("invalid path parameter {name}"), response).into()
}

/// 读取并校验 UUID 路径参数
pub fn extract_uuid_param(req: &HttpRequest, name: &str) -> Result<String, actix_web::Error> {
    req.match_info()
        .get(name)
        .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
        .map(|id| id.to_string())
        .ok_or_else(|| bad_path_param(name))
}

macro_rules! define_safe_uuid_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub String);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(extract_uuid_param(req, $param).map($name))
            }
        }
    };
}

define_safe_uuid_extractor!(SafeId, "id");
define_safe_uuid_extractor!(SafeStudentId, "student_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_valid_uuid_param() {
        let id = "0b9d5a52-6a4c-4f6e-9a55-3e1f1f1d2c3b";
        let req = TestRequest::default().param("id", id).to_http_request();
        assert_eq!(extract_uuid_param(&req, "id").unwrap(), id);
    }

    #[test]
    fn test_invalid_uuid_param() {
        let req = TestRequest::default()
            .param("id", "not-a-uuid")
            .to_http_request();
        assert!(extract_uuid_param(&req, "id").is_err());
        assert!(extract_uuid_param(&req, "student_id").is_err());
    }
}
