//! 机构范围的权限判断
//!
//! 各业务服务共用：机构管理员、教师授课范围、学生注册、家长关系。

use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::{Result, TutoriaError};
use crate::models::{
    curriculum::entities::{CurriculumLevel, CurriculumNode, Section},
    enrollments::{
        entities::{StudentEnrollment, TeacherEnrollment},
        requests::EnrollmentFilter,
    },
    institutions::entities::Institution,
    memberships::entities::{Membership, MembershipRole},
    users::entities::User,
};
use crate::storage::Storage;

/// 机构存在且当前用户是其管理员
pub async fn ensure_institution_admin(
    storage: &Arc<dyn Storage>,
    user: &User,
    institution_id: &str,
) -> Result<Institution> {
    let institution = storage
        .get_institution_by_id(institution_id)
        .await?
        .ok_or_else(|| TutoriaError::not_found("Institution not found"))?;

    if institution.admin_id == user.id
        || storage
            .get_membership(institution_id, &user.id, MembershipRole::Admin)
            .await?
            .is_some()
    {
        Ok(institution)
    } else {
        Err(TutoriaError::authorization(
            "Only the institution admin can perform this action",
        ))
    }
}

/// 当前用户管理的机构 id
pub async fn admin_institution_ids(storage: &Arc<dyn Storage>, user: &User) -> Result<Vec<String>> {
    Ok(storage
        .list_user_memberships(&user.id)
        .await?
        .into_iter()
        .filter(|m| m.role == MembershipRole::Admin)
        .map(|m| m.institution_id)
        .collect())
}

/// 用户以任何身份所属的机构 id（含自己管理的）
pub async fn member_institution_ids(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let memberships = storage.list_user_memberships(&user.id).await?;
    let administered = storage.list_institutions_by_admin(&user.id).await?;
    Ok(memberships
        .into_iter()
        .map(|m| m.institution_id)
        .chain(administered.into_iter().map(|i| i.id))
        .filter(|id| seen.insert(id.clone()))
        .collect())
}

/// 用户属于该机构，或是平台管理员
pub async fn ensure_institution_member(
    storage: &Arc<dyn Storage>,
    user: &User,
    institution_id: &str,
) -> Result<()> {
    if user.is_staff
        || member_institution_ids(storage, user)
            .await?
            .iter()
            .any(|id| id == institution_id)
    {
        Ok(())
    } else {
        Err(TutoriaError::authorization(
            "You are not a member of this institution",
        ))
    }
}

pub async fn require_membership(
    storage: &Arc<dyn Storage>,
    user_id: &str,
    institution_id: &str,
    role: MembershipRole,
) -> Result<Membership> {
    storage
        .get_membership(institution_id, user_id, role)
        .await?
        .ok_or_else(|| {
            TutoriaError::authorization(format!(
                "User is not a {role} of this institution"
            ))
        })
}

/// 教师的有效授课分配
pub async fn teacher_enrollments(
    storage: &Arc<dyn Storage>,
    user_id: &str,
    institution_id: Option<&str>,
) -> Result<Vec<TeacherEnrollment>> {
    storage
        .list_active_teacher_enrollments(user_id, institution_id)
        .await
}

/// 教师在机构中持有教师身份且授课分配覆盖该分组与科目
pub async fn ensure_teaches(
    storage: &Arc<dyn Storage>,
    user: &User,
    institution_id: &str,
    section_id: &str,
    subject_id: &str,
) -> Result<()> {
    require_membership(storage, &user.id, institution_id, MembershipRole::Teacher).await?;
    let covered = teacher_enrollments(storage, &user.id, Some(institution_id))
        .await?
        .iter()
        .any(|e| e.covers(section_id, subject_id));
    if covered {
        Ok(())
    } else {
        Err(TutoriaError::authorization(
            "You are not enrolled to teach this section and subject",
        ))
    }
}

/// 教师是否在该分组授课（不限科目）
pub async fn ensure_teaches_section(
    storage: &Arc<dyn Storage>,
    user: &User,
    institution_id: &str,
    section_id: &str,
) -> Result<Vec<TeacherEnrollment>> {
    let enrollments: Vec<_> = teacher_enrollments(storage, &user.id, Some(institution_id))
        .await?
        .into_iter()
        .filter(|e| e.covers_section(section_id))
        .collect();
    if enrollments.is_empty() {
        return Err(TutoriaError::authorization(
            "You are not enrolled to teach this section",
        ));
    }
    Ok(enrollments)
}

/// 教师可见的 (分组, 科目) 组合
pub fn section_subject_pairs(enrollments: &[TeacherEnrollment]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    enrollments
        .iter()
        .flat_map(|e| {
            e.section_ids.iter().flat_map(move |section| {
                e.subject_ids
                    .iter()
                    .map(move |subject| (section.clone(), subject.clone()))
            })
        })
        .filter(|pair| seen.insert(pair.clone()))
        .collect()
}

pub fn taught_section_ids(enrollments: &[TeacherEnrollment]) -> Vec<String> {
    let mut seen = HashSet::new();
    enrollments
        .iter()
        .flat_map(|e| e.section_ids.iter().cloned())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// 学生的有效注册
pub async fn student_enrollments(
    storage: &Arc<dyn Storage>,
    user_id: &str,
    institution_id: Option<&str>,
) -> Result<Vec<StudentEnrollment>> {
    storage
        .list_all_student_enrollments(EnrollmentFilter {
            institution_ids: institution_id.map(|id| vec![id.to_string()]),
            user_id: Some(user_id.to_string()),
            only_active: true,
            ..Default::default()
        })
        .await
}

/// 学生在该分组有有效注册
pub async fn is_enrolled_in_section(
    storage: &Arc<dyn Storage>,
    student_id: &str,
    section_id: &str,
) -> Result<bool> {
    Ok(student_enrollments(storage, student_id, None)
        .await?
        .iter()
        .any(|e| e.section_id == section_id))
}

/// 教师授课的学生 id（通过分组重叠）
pub async fn taught_student_ids(
    storage: &Arc<dyn Storage>,
    enrollments: &[TeacherEnrollment],
) -> Result<Vec<String>> {
    let mut ids = HashSet::new();
    for section_id in taught_section_ids(enrollments) {
        for student in storage.list_section_students(&section_id).await? {
            ids.insert(student.student.id);
        }
    }
    Ok(ids.into_iter().collect())
}

pub async fn ensure_parent_of(
    storage: &Arc<dyn Storage>,
    parent: &User,
    child_id: &str,
) -> Result<()> {
    if storage
        .get_parent_child(&parent.id, child_id)
        .await?
        .is_some()
    {
        Ok(())
    } else {
        Err(TutoriaError::authorization("This student is not your child"))
    }
}

/// 节点存在、属于机构且层级匹配
pub async fn node_in_institution(
    storage: &Arc<dyn Storage>,
    node_id: &str,
    institution_id: &str,
    level: CurriculumLevel,
) -> Result<CurriculumNode> {
    let node = storage
        .get_node(node_id)
        .await?
        .ok_or_else(|| TutoriaError::validation(format!("{level} {node_id} not found")))?;
    if node.institution_id != institution_id {
        return Err(TutoriaError::validation(format!(
            "{level} does not belong to this institution"
        )));
    }
    if node.level != level {
        return Err(TutoriaError::validation(format!(
            "Node {node_id} is not a {level}"
        )));
    }
    Ok(node)
}

pub async fn section_in_institution(
    storage: &Arc<dyn Storage>,
    section_id: &str,
    institution_id: &str,
) -> Result<Section> {
    let section = storage
        .get_section(section_id)
        .await?
        .ok_or_else(|| TutoriaError::validation("Section not found"))?;
    if section.institution_id != institution_id {
        return Err(TutoriaError::validation(
            "Section does not belong to this institution",
        ));
    }
    Ok(section)
}

/// 校验 track / section / subject 三者关系：分组属于 track，科目属于 track
pub async fn validate_track_section_subject(
    storage: &Arc<dyn Storage>,
    institution_id: &str,
    track_id: &str,
    section_id: &str,
    subject_id: &str,
) -> Result<()> {
    node_in_institution(storage, track_id, institution_id, CurriculumLevel::Track).await?;
    let section = section_in_institution(storage, section_id, institution_id).await?;
    if section.track_id != track_id {
        return Err(TutoriaError::validation(
            "Section does not belong to the track",
        ));
    }
    let subject =
        node_in_institution(storage, subject_id, institution_id, CurriculumLevel::Subject).await?;
    if subject.track_id != track_id {
        return Err(TutoriaError::validation(
            "Subject does not belong to the track",
        ));
    }
    ensure_subject_in_section(&subject, &section)
}

/// 科目与分组同属一个 track；科目所在流若绑定了分组，必须是该分组
pub fn ensure_subject_in_section(subject: &CurriculumNode, section: &Section) -> Result<()> {
    if subject.track_id != section.track_id {
        return Err(TutoriaError::validation(
            "Subject does not belong to the section's track",
        ));
    }
    match subject.section_id.as_deref() {
        Some(bound) if bound != section.id => Err(TutoriaError::validation(
            "Subject does not belong to the section",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(sections: &[&str], subjects: &[&str]) -> TeacherEnrollment {
        TeacherEnrollment {
            id: "te-1".to_string(),
            institution_id: "inst".to_string(),
            user_id: "teacher".to_string(),
            track_ids: vec!["track".to_string()],
            section_ids: sections.iter().map(|s| s.to_string()).collect(),
            subject_ids: subjects.iter().map(|s| s.to_string()).collect(),
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_section_subject_pairs_are_deduplicated() {
        let enrollments = vec![
            enrollment(&["s1", "s2"], &["math"]),
            enrollment(&["s1"], &["math", "physics"]),
        ];
        let pairs = section_subject_pairs(&enrollments);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("s2".to_string(), "math".to_string())));
        assert!(pairs.contains(&("s1".to_string(), "physics".to_string())));

        assert_eq!(taught_section_ids(&enrollments), vec!["s1", "s2"]);
    }

    fn section(id: &str, track_id: &str) -> Section {
        Section {
            id: id.to_string(),
            institution_id: "inst".to_string(),
            track_id: track_id.to_string(),
            name: id.to_uppercase(),
            order: 0,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_subject_bound_to_other_section() {
        let mut subject = CurriculumNode {
            id: "subject".to_string(),
            institution_id: "inst".to_string(),
            level: CurriculumLevel::Subject,
            parent_id: Some("stream".to_string()),
            track_id: "track".to_string(),
            section_id: None,
            global_item_id: "g".to_string(),
            name: "Math".to_string(),
            order: 0,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!(ensure_subject_in_section(&subject, &section("s1", "track")).is_ok());
        // 其他 track 的分组
        assert!(ensure_subject_in_section(&subject, &section("s9", "other-track")).is_err());

        subject.section_id = Some("s2".to_string());
        assert!(ensure_subject_in_section(&subject, &section("s1", "track")).is_err());
        assert!(ensure_subject_in_section(&subject, &section("s2", "track")).is_ok());
    }
}
