use std::collections::BTreeMap;

use actix_web::HttpResponse;
use serde::Serialize;
use ts_rs::TS;

use crate::models::{ApiResponse, ErrorCode};

/// 字段级校验错误集合（字段名 -> 错误信息列表）
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 单字段错误
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// 条件不满足时记录错误
    pub fn ensure(&mut self, condition: bool, field: &str, message: impl Into<String>) {
        if !condition {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// 拼接为单行描述，用于日志
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// 转换为 400 响应
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::BadRequest,
            self,
            "Validation failed",
        ))
    }

    /// 转换为 422 响应
    pub fn into_unprocessable_response(self) -> HttpResponse {
        HttpResponse::UnprocessableEntity().json(ApiResponse::error(
            ErrorCode::Unprocessable,
            self,
            "Validation failed",
        ))
    }

    /// 没有错误时返回 Ok，否则返回 400 响应
    pub fn finish(self) -> Result<(), HttpResponse> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "required");
        errors.add("email", "invalid");
        errors.ensure(false, "phone_number", "invalid");
        errors.ensure(true, "password", "never recorded");

        assert_eq!(errors.errors["email"].len(), 2);
        assert!(errors.has("phone_number"));
        assert!(!errors.has("password"));
        assert_eq!(errors.summary(), "email: required, invalid; phone_number: invalid");
    }

    #[test]
    fn test_finish() {
        assert!(ValidationErrors::new().finish().is_ok());
        let resp = ValidationErrors::single("date", "future").finish().unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
