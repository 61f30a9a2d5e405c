use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::models::{
    ApiResponse,
    curriculum::{entities::CurriculumLevel, requests::NodeFilter},
    users::entities::UserRole,
};
use crate::services::{access, current_user};

fn dedup(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

pub async fn my_tracks(
    service: &CurriculumService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut ids = Vec::new();
    if user.has_role(UserRole::Teacher) {
        for e in access::teacher_enrollments(&storage, &user.id, None).await? {
            ids.extend(e.track_ids);
        }
    }
    if user.has_role(UserRole::Student) {
        for e in access::student_enrollments(&storage, &user.id, None).await? {
            ids.push(e.track_id);
        }
    }

    let tracks = storage
        .list_all_nodes(
            Some(CurriculumLevel::Track),
            NodeFilter {
                ids: Some(dedup(ids)),
                ..Default::default()
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        tracks,
        "Tracks retrieved successfully",
    )))
}

pub async fn my_sections(
    service: &CurriculumService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut ids = Vec::new();
    if user.has_role(UserRole::Teacher) {
        let enrollments = access::teacher_enrollments(&storage, &user.id, None).await?;
        ids.extend(access::taught_section_ids(&enrollments));
    }
    if user.has_role(UserRole::Student) {
        for e in access::student_enrollments(&storage, &user.id, None).await? {
            ids.push(e.section_id);
        }
    }

    let sections = storage.get_sections_by_ids(&dedup(ids)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        sections,
        "Sections retrieved successfully",
    )))
}

pub async fn my_subjects(
    service: &CurriculumService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut subjects = Vec::new();
    if user.has_role(UserRole::Teacher) {
        let mut ids = Vec::new();
        for e in access::teacher_enrollments(&storage, &user.id, None).await? {
            ids.extend(e.subject_ids);
        }
        subjects.extend(
            storage
                .list_all_nodes(
                    Some(CurriculumLevel::Subject),
                    NodeFilter {
                        ids: Some(dedup(ids)),
                        ..Default::default()
                    },
                )
                .await?,
        );
    }
    if user.has_role(UserRole::Student) {
        // 学生看到所在 track 中未绑定分组或绑定到自己分组的科目
        for e in access::student_enrollments(&storage, &user.id, None).await? {
            let in_track = storage
                .list_all_nodes(
                    Some(CurriculumLevel::Subject),
                    NodeFilter {
                        track_id: Some(e.track_id.clone()),
                        ..Default::default()
                    },
                )
                .await?;
            subjects.extend(in_track.into_iter().filter(|s| {
                s.section_id
                    .as_deref()
                    .is_none_or(|section| section == e.section_id)
            }));
        }
    }

    let mut seen = HashSet::new();
    subjects.retain(|s| seen.insert(s.id.clone()));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        subjects,
        "Subjects retrieved successfully",
    )))
}
