use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::enrollments::requests::{
    CreateStudentEnrollmentRequest, CreateTeacherEnrollmentRequest, EnrollmentListParams,
    UpdateStudentEnrollmentRequest, UpdateTeacherEnrollmentRequest,
};
use crate::services::EnrollmentService;
use crate::utils::SafeId;

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn create_teacher_enrollment(
    req: HttpRequest,
    body: web::Json<CreateTeacherEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_teacher_enrollment(body.into_inner(), &req)
        .await
}

pub async fn list_teacher_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_teacher_enrollments(query.into_inner(), &req)
        .await
}

pub async fn get_teacher_enrollment(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_teacher_enrollment(path.0, &req).await
}

pub async fn update_teacher_enrollment(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateTeacherEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_teacher_enrollment(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_teacher_enrollment(
    req: HttpRequest,
    path: SafeId,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .delete_teacher_enrollment(path.0, &req)
        .await
}

pub async fn create_student_enrollment(
    req: HttpRequest,
    body: web::Json<CreateStudentEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_student_enrollment(body.into_inner(), &req)
        .await
}

pub async fn list_student_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_student_enrollments(query.into_inner(), &req)
        .await
}

pub async fn get_student_enrollment(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_student_enrollment(path.0, &req).await
}

pub async fn update_student_enrollment(
    req: HttpRequest,
    path: SafeId,
    body: web::Json<UpdateStudentEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_student_enrollment(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_student_enrollment(
    req: HttpRequest,
    path: SafeId,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .delete_student_enrollment(path.0, &req)
        .await
}

// 教师查看授课分组的学生
pub async fn students_by_section(req: HttpRequest, path: SafeId) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.students_by_section(path.0, &req).await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(RequireJWT)
            .service(
                web::resource("/teachers")
                    .route(web::get().to(list_teacher_enrollments))
                    .route(web::post().to(create_teacher_enrollment)),
            )
            .service(
                web::resource("/teachers/{id}")
                    .route(web::get().to(get_teacher_enrollment))
                    .route(web::put().to(update_teacher_enrollment))
                    .route(web::delete().to(delete_teacher_enrollment)),
            )
            .service(
                web::resource("/students")
                    .route(web::get().to(list_student_enrollments))
                    .route(web::post().to(create_student_enrollment)),
            )
            .service(
                web::resource("/students/{id}")
                    .route(web::get().to(get_student_enrollment))
                    .route(web::put().to(update_student_enrollment))
                    .route(web::delete().to(delete_student_enrollment)),
            )
            .route(
                "/sections/{id}/students",
                web::get().to(students_by_section),
            ),
    );
}
