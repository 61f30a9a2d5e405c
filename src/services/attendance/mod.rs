pub mod mark;
pub mod records;
pub mod stats;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::{
    attendance::requests::{
        AttendanceFilter, AttendanceListParams, AttendanceStatsParams, BulkAttendanceRequest,
        CreateAttendanceRequest, UpdateAttendanceRequest,
    },
    users::entities::User,
};
use crate::services::access;
use crate::storage::Storage;

crate::services::define_service!(AttendanceService);

/// 当前用户可见的考勤范围
///
/// 教师看授课的 (分组, 科目)，学生看自己，家长看子女；同时具备多个身份时取并集。
/// 其余用户得到空范围。
pub(crate) async fn visible_scope(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<AttendanceFilter> {
    let mut filter = AttendanceFilter::default();
    let mut student_ids = Vec::new();

    if user.is_teacher {
        let enrollments = access::teacher_enrollments(storage, &user.id, None).await?;
        filter.section_subject_pairs = Some(access::section_subject_pairs(&enrollments));
    }
    if user.is_student {
        student_ids.push(user.id.clone());
    }
    if user.is_parents {
        student_ids.extend(
            storage
                .list_children(&user.id)
                .await?
                .into_iter()
                .map(|c| c.child_id),
        );
    }
    if filter.section_subject_pairs.is_none() || !student_ids.is_empty() {
        filter.student_ids = Some(student_ids);
    }
    Ok(filter)
}

impl AttendanceService {
    pub async fn create_attendance(
        &self,
        req: CreateAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mark::create_attendance(self, req, request).await
    }

    pub async fn bulk_create_attendance(
        &self,
        req: BulkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mark::bulk_create_attendance(self, req, request).await
    }

    pub async fn list_attendance(
        &self,
        params: AttendanceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        records::list_attendance(self, params, request).await
    }

    pub async fn get_attendance(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::get_attendance(self, id, request).await
    }

    pub async fn update_attendance(
        &self,
        id: String,
        req: UpdateAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        records::update_attendance(self, id, req, request).await
    }

    pub async fn delete_attendance(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        records::delete_attendance(self, id, request).await
    }

    pub async fn statistics(
        &self,
        params: AttendanceStatsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        stats::statistics(self, params, request).await
    }
}
