use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::MembershipService;
use crate::config::AppConfig;
use crate::middlewares::require_jwt::invalidate_cached_user;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    memberships::{
        entities::MembershipRole,
        requests::{AcceptInvitationRequest, CreateInvitationRequest, NewInvitation},
    },
};
use crate::services::{access, app_cache, current_user, notify};
use crate::utils::validate::{
    Identifier, normalize_phone_number, validate_email, validate_phone_number,
};

/// 邀请目标：邮箱或手机号二选一，只能邀请教师或学生
pub(crate) fn validate_invitation(req: &CreateInvitationRequest) -> Result<Identifier, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if req.role == MembershipRole::Admin {
        errors.add("role", "Role must be teacher or student");
    }

    let email = req.email.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let phone = req
        .phone_number
        .as_deref()
        .map(normalize_phone_number)
        .filter(|s| !s.is_empty());

    let identifier = match (email, phone) {
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
        _ => {
            errors.add("email", "Provide exactly one of email or phone number");
            None
        }
    };

    match identifier {
        Some(identifier) if errors.is_empty() => Ok(identifier),
        _ => Err(errors),
    }
}

pub async fn create_invitation(
    service: &MembershipService,
    institution_id: String,
    req: CreateInvitationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let institution = access::ensure_institution_admin(&storage, &user, &institution_id).await?;

    let identifier = match validate_invitation(&req) {
        Ok(identifier) => identifier,
        Err(errors) => return Ok(errors.into_response()),
    };

    let cache = app_cache(request)?;
    notify::take_invitation_cooldown(&cache, &identifier).await?;

    let expires_at = chrono::Utc::now()
        + chrono::Duration::days(AppConfig::get().invitation.expiry_days);
    let invitation = storage
        .create_invitation(NewInvitation {
            institution_id: institution.id.clone(),
            email: identifier.is_email().then(|| identifier.as_key().to_string()),
            phone_number: (!identifier.is_email()).then(|| identifier.as_key().to_string()),
            role: req.role,
            invited_by: user.id.clone(),
            expires_at: expires_at.timestamp(),
        })
        .await?;

    // 投递失败不影响邀请本身
    if let Err(e) = notify::send_invitation(
        &identifier,
        &invitation.token,
        invitation.role.as_str(),
        &institution.name,
    )
    .await
    {
        warn!("Failed to deliver invitation {}: {}", invitation.id, e);
    }
    info!(
        "Invitation {} created for {} by {}",
        invitation.id,
        identifier.as_key(),
        user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        invitation,
        "Invitation sent successfully",
    )))
}

pub async fn list_invitations(
    service: &MembershipService,
    institution_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &institution_id).await?;

    let invitations = storage.list_invitations(&institution_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        invitations,
        "Invitations retrieved successfully",
    )))
}

pub async fn accept_invitation(
    service: &MembershipService,
    req: AcceptInvitationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let invitation = match storage.get_invitation_by_token(req.token.trim()).await? {
        Some(inv) if !inv.is_used && !inv.is_expired(chrono::Utc::now()) => inv,
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvitationInvalid,
                "Invitation is invalid, used or expired",
            )));
        }
    };

    if !invitation.matches_user(user.email.as_deref(), user.phone_number.as_deref()) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::InvitationInvalid,
            "This invitation was sent to a different account",
        )));
    }

    let membership = storage.accept_invitation(&invitation.id, &user.id).await?;
    invalidate_cached_user(&app_cache(request)?, &user.id).await;
    info!(
        "User {} joined institution {} as {}",
        user.id, membership.institution_id, membership.role
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        membership,
        "Invitation accepted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>, phone: Option<&str>, role: MembershipRole) -> CreateInvitationRequest {
        CreateInvitationRequest {
            email: email.map(str::to_string),
            phone_number: phone.map(str::to_string),
            role,
        }
    }

    #[test]
    fn test_admin_role_cannot_be_invited() {
        let errors =
            validate_invitation(&request(Some("t@school.com"), None, MembershipRole::Admin))
                .unwrap_err();
        assert!(errors.has("role"));
    }

    #[test]
    fn test_invitation_identifier() {
        let identifier =
            validate_invitation(&request(None, Some("+8801812345678"), MembershipRole::Student))
                .unwrap();
        assert_eq!(identifier, Identifier::Phone("01812345678".to_string()));

        assert!(validate_invitation(&request(None, None, MembershipRole::Teacher)).is_err());
    }
}
