pub mod manage;

use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::{
    memberships::entities::MembershipRole,
    notices::{
        entities::TargetAudience,
        requests::{CreateNoticeRequest, NoticeListParams, UpdateNoticeRequest},
    },
    users::entities::User,
};
use crate::services::access;
use crate::storage::Storage;

crate::services::define_service!(NoticeService);

fn merge(
    scopes: &mut BTreeMap<String, Vec<TargetAudience>>,
    institution_id: String,
    audiences: &[TargetAudience],
) {
    let entry = scopes.entry(institution_id).or_default();
    for audience in audiences {
        if !entry.contains(audience) {
            entry.push(*audience);
        }
    }
}

/// 用户在各机构可见的通知受众
///
/// 机构身份决定受众；家长按子女就读的机构看 `parents` 与 `all`。
pub(crate) async fn audience_scopes(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<BTreeMap<String, Vec<TargetAudience>>> {
    let mut scopes = BTreeMap::new();
    for membership in storage.list_user_memberships(&user.id).await? {
        merge(
            &mut scopes,
            membership.institution_id,
            TargetAudience::visible_to(membership.role),
        );
    }
    for institution in storage.list_institutions_by_admin(&user.id).await? {
        merge(
            &mut scopes,
            institution.id,
            TargetAudience::visible_to(MembershipRole::Admin),
        );
    }
    if user.is_parents {
        for child in storage.list_children(&user.id).await? {
            for enrollment in access::student_enrollments(storage, &child.child_id, None).await? {
                merge(
                    &mut scopes,
                    enrollment.institution_id,
                    &[TargetAudience::Parents, TargetAudience::All],
                );
            }
        }
    }
    Ok(scopes)
}

impl NoticeService {
    pub async fn create_notice(
        &self,
        req: CreateNoticeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_notice(self, req, request).await
    }

    pub async fn list_notices(
        &self,
        params: NoticeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_notices(self, params, request).await
    }

    pub async fn get_notice(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_notice(self, id, request).await
    }

    pub async fn update_notice(
        &self,
        id: String,
        update: UpdateNoticeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_notice(self, id, update, request).await
    }

    pub async fn delete_notice(&self, id: String, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_notice(self, id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_deduplicates_audiences() {
        let mut scopes = BTreeMap::new();
        merge(
            &mut scopes,
            "inst".to_string(),
            TargetAudience::visible_to(MembershipRole::Teacher),
        );
        merge(
            &mut scopes,
            "inst".to_string(),
            &[TargetAudience::Parents, TargetAudience::All],
        );
        assert_eq!(
            scopes["inst"],
            vec![
                TargetAudience::Teachers,
                TargetAudience::All,
                TargetAudience::Parents
            ]
        );
    }
}
