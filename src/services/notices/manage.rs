use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{NoticeService, audience_scopes};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    memberships::entities::MembershipRole,
    notices::{
        entities::Notice,
        requests::{CreateNoticeRequest, NoticeFilter, NoticeListParams, UpdateNoticeRequest},
    },
    users::entities::User,
};
use crate::services::{access, current_user};
use crate::storage::Storage;

/// 机构管理员，或持有教师身份
async fn can_publish(storage: &Arc<dyn Storage>, user: &User, institution_id: &str) -> Result<bool> {
    match access::ensure_institution_admin(storage, user, institution_id).await {
        Ok(_) => return Ok(true),
        Err(TutoriaError::Authorization(_)) => {}
        Err(e) => return Err(e),
    }
    Ok(storage
        .get_membership(institution_id, &user.id, MembershipRole::Teacher)
        .await?
        .is_some())
}

/// 创建者或机构管理员
async fn load_managed(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: &str,
) -> Result<std::result::Result<Notice, HttpResponse>> {
    let Some(notice) = storage.get_notice(id).await? else {
        return Ok(Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Notice not found",
        ))));
    };
    if notice.created_by != user.id {
        match access::ensure_institution_admin(storage, user, &notice.institution_id).await {
            Ok(_) => {}
            Err(TutoriaError::Authorization(_)) => {
                return Ok(Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "Only the author or the institution admin can modify this notice",
                ))));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(Ok(notice))
}

pub async fn create_notice(
    service: &NoticeService,
    req: CreateNoticeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if !can_publish(&storage, &user, &req.institution_id).await? {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only institution admins and teachers can publish notices",
        )));
    }
    if let Err(resp) = req.validate().finish() {
        return Ok(resp);
    }

    let notice = storage.create_notice(&user.id, req).await?;
    info!(
        "Notice {} for {} published by {}",
        notice.id, notice.target_audience, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        notice,
        "Notice created successfully",
    )))
}

pub async fn list_notices(
    service: &NoticeService,
    params: NoticeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let scopes = audience_scopes(&storage, &user).await?;
    let scopes = scopes
        .into_iter()
        .filter(|(institution_id, _)| {
            params
                .institution_id
                .as_deref()
                .is_none_or(|wanted| wanted == institution_id)
        })
        .collect();

    let notices = storage
        .list_notices(
            NoticeFilter {
                scopes,
                notice_type: params.notice_type,
                include_inactive: false,
            },
            params.pagination,
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        notices,
        "Notices retrieved successfully",
    )))
}

pub async fn get_notice(
    service: &NoticeService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(notice) = storage.get_notice(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Notice not found",
        )));
    };

    let readable = notice.is_active
        && audience_scopes(&storage, &user)
            .await?
            .get(&notice.institution_id)
            .is_some_and(|audiences| audiences.contains(&notice.target_audience));
    if !readable && notice.created_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this notice",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        notice,
        "Notice retrieved successfully",
    )))
}

pub async fn update_notice(
    service: &NoticeService,
    id: String,
    update: UpdateNoticeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed(&storage, &user, &id).await? {
        return Ok(resp);
    }

    let mut errors = ValidationErrors::new();
    if let Some(title) = &update.title {
        errors.ensure(!title.trim().is_empty(), "title", "Title is required");
    }
    if let Some(content) = &update.content {
        errors.ensure(!content.trim().is_empty(), "content", "Content is required");
    }
    if let Err(resp) = errors.finish() {
        return Ok(resp);
    }

    match storage.update_notice(&id, update).await? {
        Some(notice) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            notice,
            "Notice updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Notice not found",
        ))),
    }
}

pub async fn delete_notice(
    service: &NoticeService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed(&storage, &user, &id).await? {
        return Ok(resp);
    }

    storage.delete_notice(&id).await?;
    info!("Notice {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Notice deleted successfully",
    )))
}
