use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AuthService, find_by_identifier};
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    auth::{requests::RegisterRequest, responses::RegisterResponse},
    users::requests::NewUser,
};
use crate::services::{app_cache, notify};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    Identifier, normalize_phone_number, validate_email, validate_password, validate_phone_number,
};

/// 校验注册请求，返回规范化后的标识
pub(crate) fn validate_register_request(
    req: &RegisterRequest,
) -> Result<Identifier, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let email = req.email.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let phone = req
        .phone_number
        .as_deref()
        .map(normalize_phone_number)
        .filter(|s| !s.is_empty());

    let identifier = match (email, phone) {
        (Some(_), Some(_)) => {
            errors.add("email", "Provide either email or phone number, not both");
            None
        }
        (None, None) => {
            errors.add("email", "Either email or phone number is required");
            None
        }
        (Some(email), None) => {
            if let Err(msg) = validate_email(email) {
                errors.add("email", msg);
            }
            Some(Identifier::Email(email.to_lowercase()))
        }
        (None, Some(phone)) => {
            if let Err(msg) = validate_phone_number(&phone) {
                errors.add("phone_number", msg);
            }
            Some(Identifier::Phone(phone))
        }
    };

    let policy = validate_password(&req.password);
    for msg in policy.errors {
        errors.add("password", msg);
    }

    match identifier {
        Some(identifier) if errors.is_empty() => Ok(identifier),
        _ => Err(errors),
    }
}

pub async fn handle_register(
    service: &AuthService,
    req: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identifier = match validate_register_request(&req) {
        Ok(identifier) => identifier,
        Err(errors) => return Ok(errors.into_response()),
    };

    let storage = service.get_storage(request)?;
    let cache = app_cache(request)?;
    // 冷却期内不改动任何账号
    notify::take_otp_cooldown(&cache, &identifier).await?;

    let is_institution = req.role.as_deref() == Some("institution");
    let new_user = NewUser {
        email: identifier.is_email().then(|| identifier.as_key().to_string()),
        phone_number: (!identifier.is_email()).then(|| identifier.as_key().to_string()),
        password_hash: hash_password(&req.password)?,
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        is_institution,
        is_admission_seeker: !is_institution,
        is_active: false,
        is_staff: false,
    };

    let user = match find_by_identifier(&storage, &identifier).await? {
        Some(existing) if existing.is_active => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "A user with this email or phone number already exists",
            )));
        }
        Some(existing) => {
            info!("Re-registering inactive user {}", existing.id);
            match storage.reset_inactive_user(&existing.id, new_user).await? {
                Some(user) => user,
                None => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::UserNotFound,
                        "User not found",
                    )));
                }
            }
        }
        None => storage.create_user(new_user).await?,
    };

    notify::send_otp(&cache, &identifier, "registration").await?;
    info!("User {} registered, OTP sent", user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        RegisterResponse {
            user_id: user.id,
            otp_sent_to: identifier.as_key().to_string(),
        },
        "Registration successful, please verify the OTP",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test::TestRequest, web};

    use crate::cache::{ObjectCache, object_cache::moka::MokaCacheWrapper};
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};

    fn request(email: Option<&str>, phone: Option<&str>, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.map(str::to_string),
            phone_number: phone.map(str::to_string),
            password: password.to_string(),
            role: None,
            first_name: "Karim".to_string(),
            last_name: "Hasan".to_string(),
        }
    }

    #[test]
    fn test_exactly_one_identifier_required() {
        let errors = validate_register_request(&request(None, None, "secret123")).unwrap_err();
        assert!(errors.has("email"));

        let errors = validate_register_request(&request(
            Some("a@b.com"),
            Some("01712345678"),
            "secret123",
        ))
        .unwrap_err();
        assert!(errors.has("email"));
    }

    #[test]
    fn test_phone_is_normalized() {
        let identifier =
            validate_register_request(&request(None, Some("+8801712345678"), "secret123"))
                .unwrap();
        assert_eq!(identifier, Identifier::Phone("01712345678".to_string()));

        let errors =
            validate_register_request(&request(None, Some("12345"), "secret123")).unwrap_err();
        assert!(errors.has("phone_number"));
    }

    #[test]
    fn test_weak_password_rejected() {
        let errors =
            validate_register_request(&request(Some("a@b.com"), None, "short")).unwrap_err();
        assert!(errors.has("password"));
        assert!(!errors.has("email"));
    }

    #[actix_web::test]
    async fn test_register_in_cooldown_leaves_accounts_untouched() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
        let identifier = Identifier::Email("cooling@example.com".to_string());
        notify::take_otp_cooldown(&cache, &identifier).await.unwrap();

        let service = AuthService::with_storage(storage.clone());
        let http = TestRequest::default()
            .app_data(web::Data::new(cache.clone()))
            .to_http_request();
        let err = handle_register(
            &service,
            request(Some("cooling@example.com"), None, "secret123"),
            &http,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert!(
            storage
                .get_user_by_email("cooling@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }
}
