use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttendanceService, visible_scope};
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::Attendance,
        requests::{AttendanceListParams, UpdateAttendanceRequest},
    },
    users::entities::User,
};
use crate::services::{access, current_user};
use crate::storage::Storage;

/// 记录创建者，或在该分组与科目授课的教师
async fn can_manage(storage: &Arc<dyn Storage>, user: &User, record: &Attendance) -> Result<bool> {
    if record.created_by == user.id {
        return Ok(true);
    }
    Ok(
        access::teacher_enrollments(storage, &user.id, Some(&record.institution_id))
            .await?
            .iter()
            .any(|e| e.covers(&record.section_id, &record.subject_id)),
    )
}

async fn load_managed(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: &str,
) -> Result<std::result::Result<Attendance, HttpResponse>> {
    let Some(record) = storage.get_attendance(id).await? else {
        return Ok(Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Attendance record not found",
        ))));
    };
    if !can_manage(storage, user, &record).await? {
        return Ok(Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to manage this attendance record",
        ))));
    }
    Ok(Ok(record))
}

pub async fn list_attendance(
    service: &AttendanceService,
    params: AttendanceListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut filter = visible_scope(&storage, &user).await?;
    filter.date = params.date;
    filter.section_id = params.section_id;
    filter.subject_id = params.subject_id;
    filter.student_id = params.student_id;

    let records = storage.list_attendance(filter, params.pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        records,
        "Attendance retrieved successfully",
    )))
}

pub async fn get_attendance(
    service: &AttendanceService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match load_managed(&storage, &user, &id).await? {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            "Attendance retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn update_attendance(
    service: &AttendanceService,
    id: String,
    req: UpdateAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed(&storage, &user, &id).await? {
        return Ok(resp);
    }

    match storage.update_attendance_status(&id, req.status).await? {
        Some(record) => {
            info!("Attendance {} set to {} by {}", id, record.status, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                record,
                "Attendance updated successfully",
            )))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Attendance record not found",
        ))),
    }
}

pub async fn delete_attendance(
    service: &AttendanceService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed(&storage, &user, &id).await? {
        return Ok(resp);
    }

    storage.delete_attendance(&id).await?;
    info!("Attendance {} deleted by {}", id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Attendance deleted successfully",
    )))
}
