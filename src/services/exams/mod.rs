pub mod exams;
pub mod marks;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        entities::Exam,
        requests::{
            CreateExamMarkRequest, CreateExamRequest, ExamListParams, ExamMarkListParams,
            UpdateExamMarkRequest, UpdateExamRequest,
        },
    },
    users::entities::User,
};
use crate::services::access;
use crate::storage::Storage;

crate::services::define_service!(ExamService);

/// 考试创建者或该分组与科目的授课教师
pub(crate) async fn teaches_exam(storage: &Arc<dyn Storage>, user: &User, exam: &Exam) -> Result<bool> {
    if exam.created_by == user.id {
        return Ok(true);
    }
    Ok(
        access::teacher_enrollments(storage, &user.id, Some(&exam.institution_id))
            .await?
            .iter()
            .any(|e| e.covers(&exam.section_id, &exam.subject_id)),
    )
}

pub(crate) async fn load_exam(
    storage: &Arc<dyn Storage>,
    id: &str,
) -> Result<std::result::Result<Exam, HttpResponse>> {
    Ok(storage.get_exam(id).await?.ok_or_else(|| {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Exam not found",
        ))
    }))
}

impl ExamService {
    pub async fn create_exam(
        &self,
        req: CreateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exams::create_exam(self, req, request).await
    }

    pub async fn list_exams(
        &self,
        params: ExamListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exams::list_exams(self, params, request).await
    }

    pub async fn created_exams(
        &self,
        params: ExamListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exams::created_exams(self, params, request).await
    }

    pub async fn get_exam(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        exams::get_exam(self, id, request).await
    }

    pub async fn update_exam(
        &self,
        id: String,
        update: UpdateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exams::update_exam(self, id, update, request).await
    }

    pub async fn delete_exam(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        exams::delete_exam(self, id, request).await
    }

    pub async fn create_mark(
        &self,
        req: CreateExamMarkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        marks::create_mark(self, req, request).await
    }

    pub async fn list_marks(
        &self,
        params: ExamMarkListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        marks::list_marks(self, params, request).await
    }

    pub async fn update_mark(
        &self,
        id: String,
        update: UpdateExamMarkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        marks::update_mark(self, id, update, request).await
    }

    pub async fn delete_mark(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        marks::delete_mark(self, id, request).await
    }
}
