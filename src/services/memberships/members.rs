use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MembershipService;
use crate::models::{ApiResponse, memberships::requests::MemberListParams};
use crate::services::{access, current_user};

pub async fn my_memberships(
    service: &MembershipService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let memberships = storage.list_my_memberships(&user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        memberships,
        "Memberships retrieved successfully",
    )))
}

pub async fn institution_members(
    service: &MembershipService,
    institution_id: String,
    params: MemberListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &institution_id).await?;

    let members = storage
        .list_institution_members(&institution_id, params)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        members,
        "Institution members retrieved successfully",
    )))
}
