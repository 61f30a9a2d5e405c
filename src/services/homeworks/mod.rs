pub mod manage;
pub mod submissions;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    homeworks::{
        entities::Homework,
        requests::{
            CreateHomeworkRequest, HomeworkListParams, MarkSubmissionRequest,
            SubmissionListParams, UpdateHomeworkRequest,
        },
    },
    users::entities::User,
};
use crate::services::access;
use crate::storage::Storage;

crate::services::define_service!(HomeworkService);

/// 家长的子女 id
pub(crate) async fn child_ids(storage: &Arc<dyn Storage>, user: &User) -> Result<Vec<String>> {
    if !user.is_parents {
        return Ok(vec![]);
    }
    Ok(storage
        .list_children(&user.id)
        .await?
        .into_iter()
        .map(|c| c.child_id)
        .collect())
}

/// 学生本人及子女在读的分组
pub(crate) async fn learner_section_ids(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Vec<String>> {
    let mut learners = child_ids(storage, user).await?;
    if user.is_student {
        learners.push(user.id.clone());
    }
    let mut sections = Vec::new();
    for learner in learners {
        for enrollment in access::student_enrollments(storage, &learner, None).await? {
            if !sections.contains(&enrollment.section_id) {
                sections.push(enrollment.section_id);
            }
        }
    }
    Ok(sections)
}

/// 在该作业的分组与科目授课
pub(crate) async fn teaches_homework(
    storage: &Arc<dyn Storage>,
    user: &User,
    homework: &Homework,
) -> Result<bool> {
    Ok(
        access::teacher_enrollments(storage, &user.id, Some(&homework.institution_id))
            .await?
            .iter()
            .any(|e| e.covers(&homework.section_id, &homework.subject_id)),
    )
}

pub(crate) async fn load_homework(
    storage: &Arc<dyn Storage>,
    id: &str,
) -> Result<std::result::Result<Homework, HttpResponse>> {
    Ok(storage.get_homework(id).await?.ok_or_else(|| {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Homework not found",
        ))
    }))
}

impl HomeworkService {
    pub async fn create_homework(
        &self,
        req: CreateHomeworkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_homework(self, req, request).await
    }

    pub async fn list_homeworks(
        &self,
        params: HomeworkListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_homeworks(self, params, request).await
    }

    pub async fn get_homework(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_homework(self, id, request).await
    }

    pub async fn update_homework(
        &self,
        id: String,
        update: UpdateHomeworkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_homework(self, id, update, request).await
    }

    pub async fn delete_homework(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_homework(self, id, request).await
    }

    pub async fn mark_submission(
        &self,
        id: String,
        req: MarkSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::mark_submission(self, id, req, request).await
    }

    pub async fn list_submissions(
        &self,
        id: String,
        params: SubmissionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, id, params, request).await
    }
}
