pub mod students;
pub mod teachers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::enrollments::requests::{
    CreateStudentEnrollmentRequest, CreateTeacherEnrollmentRequest, EnrollmentListParams,
    UpdateStudentEnrollmentRequest, UpdateTeacherEnrollmentRequest,
};

crate::services::define_service!(EnrollmentService);

impl EnrollmentService {
    // 教师授课分配
    pub async fn create_teacher_enrollment(
        &self,
        req: CreateTeacherEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::create_teacher_enrollment(self, req, request).await
    }

    pub async fn list_teacher_enrollments(
        &self,
        params: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::list_teacher_enrollments(self, params, request).await
    }

    pub async fn get_teacher_enrollment(
        &self,
        id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::get_teacher_enrollment(self, id, request).await
    }

    pub async fn update_teacher_enrollment(
        &self,
        id: String,
        update: UpdateTeacherEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::update_teacher_enrollment(self, id, update, request).await
    }

    pub async fn delete_teacher_enrollment(
        &self,
        id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::delete_teacher_enrollment(self, id, request).await
    }

    // 学生注册
    pub async fn create_student_enrollment(
        &self,
        req: CreateStudentEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::create_student_enrollment(self, req, request).await
    }

    pub async fn list_student_enrollments(
        &self,
        params: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::list_student_enrollments(self, params, request).await
    }

    pub async fn get_student_enrollment(
        &self,
        id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::get_student_enrollment(self, id, request).await
    }

    pub async fn update_student_enrollment(
        &self,
        id: String,
        update: UpdateStudentEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::update_student_enrollment(self, id, update, request).await
    }

    pub async fn delete_student_enrollment(
        &self,
        id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::delete_student_enrollment(self, id, request).await
    }

    pub async fn students_by_section(
        &self,
        section_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::students_by_section(self, section_id, request).await
    }
}

/// 管理员可见的机构范围：指定机构需校验，否则取其管理的全部机构
pub(crate) async fn admin_scope(
    storage: &std::sync::Arc<dyn crate::storage::Storage>,
    user: &crate::models::users::entities::User,
    institution_id: Option<String>,
) -> crate::errors::Result<Vec<String>> {
    match institution_id {
        Some(id) => {
            crate::services::access::ensure_institution_admin(storage, user, &id).await?;
            Ok(vec![id])
        }
        None => crate::services::access::admin_institution_ids(storage, user).await,
    }
}
