use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CurriculumService;
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::{
        entities::{CurriculumLevel, CurriculumNode, GlobalCurriculumItem, Section},
        requests::{CreateNodeRequest, NewNode, NodeFilter, NodeListParams, UpdateNodeRequest},
    },
};
use crate::services::{access, current_user};

/// 根据上级节点推导新节点的位置
///
/// - track 没有上级，也不能绑定分组
/// - 其余层级的上级必须是前一层级且属于同一机构
/// - 只有 stream 可以绑定分组，分组必须属于 stream 的 track
/// - 下级节点继承上级的 track 与分组
pub(crate) fn plan_node(
    level: CurriculumLevel,
    req: &CreateNodeRequest,
    global: &GlobalCurriculumItem,
    parent: Option<&CurriculumNode>,
    section: Option<&Section>,
) -> Result<NewNode> {
    if global.level != level {
        return Err(TutoriaError::validation(format!(
            "Global item is a {}, expected a {level}",
            global.level
        )));
    }
    if req.section_id.is_some() && level != CurriculumLevel::Stream {
        return Err(TutoriaError::validation(
            "Only streams can be bound to a section",
        ));
    }

    let (track_id, section_id) = match (level.parent(), parent) {
        (None, None) => (None, None),
        (None, Some(_)) => {
            return Err(TutoriaError::validation("A track cannot have a parent"));
        }
        (Some(expected), None) => {
            return Err(TutoriaError::validation(format!(
                "A {level} requires a parent {expected}"
            )));
        }
        (Some(expected), Some(parent)) => {
            if parent.level != expected {
                return Err(TutoriaError::validation(format!(
                    "Parent of a {level} must be a {expected}"
                )));
            }
            if parent.institution_id != req.institution_id {
                return Err(TutoriaError::validation(
                    "Parent does not belong to this institution",
                ));
            }
            let section_id = match (level, section) {
                (CurriculumLevel::Stream, Some(section)) => {
                    if section.track_id != parent.track_id {
                        return Err(TutoriaError::validation(
                            "Section does not belong to the stream's track",
                        ));
                    }
                    Some(section.id.clone())
                }
                (CurriculumLevel::Stream, None) => None,
                _ => parent.section_id.clone(),
            };
            (Some(parent.track_id.clone()), section_id)
        }
    };

    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(&global.name)
        .to_string();

    Ok(NewNode {
        institution_id: req.institution_id.clone(),
        level,
        parent_id: parent.map(|p| p.id.clone()),
        track_id,
        section_id,
        global_item_id: global.id.clone(),
        name,
        order: req.order,
    })
}

pub async fn create_node(
    service: &CurriculumService,
    level: CurriculumLevel,
    req: CreateNodeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    access::ensure_institution_admin(&storage, &user, &req.institution_id).await?;

    let Some(global) = storage.get_global_item(&req.global_item_id).await? else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CurriculumInvalid,
            "Global curriculum item not found",
        )));
    };

    let parent = match &req.parent_id {
        Some(parent_id) => match storage.get_node(parent_id).await? {
            Some(node) => Some(node),
            None => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::CurriculumInvalid,
                    "Parent node not found",
                )));
            }
        },
        None => None,
    };

    let section = match &req.section_id {
        Some(section_id) => {
            Some(access::section_in_institution(&storage, section_id, &req.institution_id).await?)
        }
        None => None,
    };

    let new_node = match plan_node(level, &req, &global, parent.as_ref(), section.as_ref()) {
        Ok(node) => node,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::CurriculumInvalid,
                e.message(),
            )));
        }
    };

    let node = storage.create_node(new_node).await?;
    info!("{} {} created by {}", level, node.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        node,
        format!("{level} created successfully"),
    )))
}

pub async fn list_nodes(
    service: &CurriculumService,
    level: CurriculumLevel,
    params: NodeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let institution_ids = match params.institution_id {
        Some(institution_id) => {
            access::ensure_institution_member(&storage, &user, &institution_id).await?;
            vec![institution_id]
        }
        None => access::member_institution_ids(&storage, &user).await?,
    };

    let nodes = storage
        .list_nodes(
            level,
            NodeFilter {
                institution_ids: Some(institution_ids),
                parent_id: params.parent_id,
                track_id: params.track_id,
                section_id: params.section_id,
                ids: None,
            },
            params.pagination,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        nodes,
        format!("{level} list retrieved successfully"),
    )))
}

pub async fn get_node(
    service: &CurriculumService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(node) = storage.get_node(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Curriculum node not found",
        )));
    };
    access::ensure_institution_member(&storage, &user, &node.institution_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        node,
        "Curriculum node retrieved successfully",
    )))
}

pub async fn update_node(
    service: &CurriculumService,
    id: String,
    update: UpdateNodeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(node) = storage.get_node(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Curriculum node not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &node.institution_id).await?;

    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Ok(crate::models::ValidationErrors::single("name", "Name cannot be empty")
            .into_response());
    }

    match storage.update_node(&id, update).await? {
        Some(node) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            node,
            "Curriculum node updated successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Curriculum node not found",
        ))),
    }
}

pub async fn delete_node(
    service: &CurriculumService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(node) = storage.get_node(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Curriculum node not found",
        )));
    };
    access::ensure_institution_admin(&storage, &user, &node.institution_id).await?;

    storage.delete_node(&id).await?;
    info!("{} {} deleted by {}", node.level, node.id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Curriculum node deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::institutions::entities::InstitutionType;

    fn global(level: CurriculumLevel) -> GlobalCurriculumItem {
        GlobalCurriculumItem {
            id: "g-1".to_string(),
            level,
            name: "Physics".to_string(),
            code: None,
            description: None,
            content: None,
            content_type: None,
            video_url: None,
            image_url: None,
            institution_type: InstitutionType::HighSchool,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn node(id: &str, level: CurriculumLevel, section_id: Option<&str>) -> CurriculumNode {
        CurriculumNode {
            id: id.to_string(),
            institution_id: "inst".to_string(),
            level,
            parent_id: None,
            track_id: "track".to_string(),
            section_id: section_id.map(str::to_string),
            global_item_id: "g".to_string(),
            name: id.to_string(),
            order: 0,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn section(track_id: &str) -> Section {
        Section {
            id: "sec".to_string(),
            institution_id: "inst".to_string(),
            track_id: track_id.to_string(),
            name: "A".to_string(),
            order: 0,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn request(parent: Option<&str>, section: Option<&str>) -> CreateNodeRequest {
        CreateNodeRequest {
            institution_id: "inst".to_string(),
            parent_id: parent.map(str::to_string),
            section_id: section.map(str::to_string),
            global_item_id: "g-1".to_string(),
            name: None,
            order: 1,
        }
    }

    #[test]
    fn test_track_has_no_parent() {
        let planned = plan_node(
            CurriculumLevel::Track,
            &request(None, None),
            &global(CurriculumLevel::Track),
            None,
            None,
        )
        .unwrap();
        assert_eq!(planned.track_id, None);
        assert_eq!(planned.name, "Physics");

        let parent = node("t0", CurriculumLevel::Track, None);
        assert!(
            plan_node(
                CurriculumLevel::Track,
                &request(Some("t0"), None),
                &global(CurriculumLevel::Track),
                Some(&parent),
                None,
            )
            .is_err()
        );
    }

    #[test]
    fn test_parent_level_and_global_level_enforced() {
        let track = node("track", CurriculumLevel::Track, None);
        assert!(
            plan_node(
                CurriculumLevel::Subject,
                &request(Some("track"), None),
                &global(CurriculumLevel::Subject),
                Some(&track),
                None,
            )
            .is_err()
        );
        assert!(
            plan_node(
                CurriculumLevel::Stream,
                &request(Some("track"), None),
                &global(CurriculumLevel::Subject),
                Some(&track),
                None,
            )
            .is_err()
        );
    }

    #[test]
    fn test_stream_section_must_share_track() {
        let track = node("track", CurriculumLevel::Track, None);
        let planned = plan_node(
            CurriculumLevel::Stream,
            &request(Some("track"), Some("sec")),
            &global(CurriculumLevel::Stream),
            Some(&track),
            Some(&section("track")),
        )
        .unwrap();
        assert_eq!(planned.section_id.as_deref(), Some("sec"));
        assert_eq!(planned.track_id.as_deref(), Some("track"));

        assert!(
            plan_node(
                CurriculumLevel::Stream,
                &request(Some("track"), Some("sec")),
                &global(CurriculumLevel::Stream),
                Some(&track),
                Some(&section("other-track")),
            )
            .is_err()
        );
    }

    #[test]
    fn test_descendants_inherit_section() {
        let stream = node("stream", CurriculumLevel::Stream, Some("sec"));
        let planned = plan_node(
            CurriculumLevel::Subject,
            &request(Some("stream"), None),
            &global(CurriculumLevel::Subject),
            Some(&stream),
            None,
        )
        .unwrap();
        assert_eq!(planned.section_id.as_deref(), Some("sec"));

        assert!(
            plan_node(
                CurriculumLevel::Subject,
                &request(Some("stream"), Some("sec")),
                &global(CurriculumLevel::Subject),
                Some(&stream),
                None,
            )
            .is_err()
        );
    }
}
