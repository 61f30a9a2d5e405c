use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::{SeaOrmStorage, db_error, users::apply_role_flags, write_error};
use crate::entity::{
    admission_requests, institution_memberships, institutions, invitations,
    parent_child_relationships, users,
};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    memberships::{
        entities::{
            AdmissionRequest, AdmissionStatus, Invitation, Membership, MembershipRole, ParentChild,
        },
        requests::{MemberListParams, NewInvitation},
        responses::{MemberResponse, MyMembershipResponse, ParentChildResponse},
    },
    users::requests::RoleFlagsUpdate,
};
use crate::storage::MembershipStorage;
use crate::utils::{new_id, now_ts};

/// 写入成员关系并同步用户角色标志，调用方负责事务
async fn insert_membership<C: ConnectionTrait>(
    conn: &C,
    institution_id: &str,
    user_id: &str,
    role: MembershipRole,
) -> Result<Membership> {
    let membership = institution_memberships::ActiveModel {
        id: Set(new_id()),
        institution_id: Set(institution_id.to_string()),
        user_id: Set(user_id.to_string()),
        role: Set(role.to_string()),
        created_at: Set(now_ts()),
    }
    .insert(conn)
    .await
    .map_err(write_error("创建成员关系失败", "User is already a member"))?;

    let flags = match role {
        MembershipRole::Teacher => RoleFlagsUpdate {
            is_teacher: Some(true),
            is_admission_seeker: Some(false),
            ..Default::default()
        },
        MembershipRole::Student => RoleFlagsUpdate {
            is_student: Some(true),
            is_admission_seeker: Some(false),
            ..Default::default()
        },
        MembershipRole::Admin => RoleFlagsUpdate {
            is_institution: Some(true),
            ..Default::default()
        },
    };
    set_user_flags(conn, user_id, flags).await?;

    Ok(membership.into_membership())
}

async fn set_user_flags<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    flags: RoleFlagsUpdate,
) -> Result<()> {
    let user = users::Entity::find_by_id(user_id)
        .one(conn)
        .await
        .map_err(db_error("查询用户失败"))?
        .ok_or_else(|| TutoriaError::not_found("User not found"))?;

    let mut model: users::ActiveModel = user.into();
    apply_role_flags(&mut model, flags);
    model.updated_at = Set(now_ts());
    model
        .update(conn)
        .await
        .map_err(db_error("更新用户角色失败"))?;
    Ok(())
}

#[async_trait]
impl MembershipStorage for SeaOrmStorage {
    async fn get_membership(
        &self,
        institution_id: &str,
        user_id: &str,
        role: MembershipRole,
    ) -> Result<Option<Membership>> {
        let result = institution_memberships::Entity::find()
            .filter(institution_memberships::Column::InstitutionId.eq(institution_id))
            .filter(institution_memberships::Column::UserId.eq(user_id))
            .filter(institution_memberships::Column::Role.eq(role.as_str()))
            .one(&self.db)
            .await
            .map_err(db_error("查询成员关系失败"))?;

        Ok(result.map(|m| m.into_membership()))
    }

    async fn list_user_memberships(&self, user_id: &str) -> Result<Vec<Membership>> {
        let result = institution_memberships::Entity::find()
            .filter(institution_memberships::Column::UserId.eq(user_id))
            .order_by_asc(institution_memberships::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询成员关系失败"))?;

        Ok(result.into_iter().map(|m| m.into_membership()).collect())
    }

    async fn list_my_memberships(&self, user_id: &str) -> Result<Vec<MyMembershipResponse>> {
        let rows = institution_memberships::Entity::find()
            .filter(institution_memberships::Column::UserId.eq(user_id))
            .order_by_asc(institution_memberships::Column::CreatedAt)
            .find_also_related(institutions::Entity)
            .all(&self.db)
            .await
            .map_err(db_error("查询我的机构失败"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(membership, institution)| {
                let institution = institution?;
                let membership = membership.into_membership();
                Some(MyMembershipResponse {
                    membership_id: membership.id,
                    institution_id: institution.id,
                    institution_name: institution.name,
                    role: membership.role,
                })
            })
            .collect())
    }

    async fn list_institution_members(
        &self,
        institution_id: &str,
        params: MemberListParams,
    ) -> Result<PaginatedResponse<MemberResponse>> {
        let (page, size) = params.pagination.normalized();

        let mut select = institution_memberships::Entity::find()
            .filter(institution_memberships::Column::InstitutionId.eq(institution_id));
        if let Some(role) = params.role {
            select = select.filter(institution_memberships::Column::Role.eq(role.as_str()));
        }

        let paginator = select
            .order_by_desc(institution_memberships::Column::CreatedAt)
            .find_also_related(users::Entity)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询成员总数失败"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询成员列表失败"))?;

        let items = rows
            .into_iter()
            .filter_map(|(membership, user)| {
                Some(MemberResponse {
                    membership: membership.into_membership(),
                    user: user?.into_user(),
                })
            })
            .collect();

        Ok(PaginatedResponse::new(
            items,
            PaginationInfo::new(page, size, total),
        ))
    }

    async fn create_invitation(&self, invitation: NewInvitation) -> Result<Invitation> {
        let result = invitations::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(invitation.institution_id),
            email: Set(invitation.email),
            phone_number: Set(invitation.phone_number),
            role: Set(invitation.role.to_string()),
            token: Set(new_id()),
            invited_by: Set(invitation.invited_by),
            is_used: Set(false),
            expires_at: Set(invitation.expires_at),
            created_at: Set(now_ts()),
        }
        .insert(&self.db)
        .await
        .map_err(write_error("创建邀请失败", "Invitation token collision"))?;

        Ok(result.into_invitation())
    }

    async fn list_invitations(&self, institution_id: &str) -> Result<Vec<Invitation>> {
        let result = invitations::Entity::find()
            .filter(invitations::Column::InstitutionId.eq(institution_id))
            .order_by_desc(invitations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询邀请列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_invitation()).collect())
    }

    async fn get_invitation_by_token(&self, token: &str) -> Result<Option<Invitation>> {
        let result = invitations::Entity::find()
            .filter(invitations::Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(db_error("查询邀请失败"))?;

        Ok(result.map(|m| m.into_invitation()))
    }

    async fn accept_invitation(&self, invitation_id: &str, user_id: &str) -> Result<Membership> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let invitation = invitations::Entity::find_by_id(invitation_id)
            .one(&txn)
            .await
            .map_err(db_error("查询邀请失败"))?
            .ok_or_else(|| TutoriaError::not_found("Invitation not found"))?;
        if invitation.is_used {
            return Err(TutoriaError::validation("Invitation has already been used"));
        }

        let institution_id = invitation.institution_id.clone();
        let role = invitation
            .role
            .parse::<MembershipRole>()
            .map_err(TutoriaError::validation)?;

        let mut model: invitations::ActiveModel = invitation.into();
        model.is_used = Set(true);
        model
            .update(&txn)
            .await
            .map_err(db_error("更新邀请失败"))?;

        let membership = insert_membership(&txn, &institution_id, user_id, role).await?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(membership)
    }

    async fn create_parent_child(&self, parent_id: &str, child_id: &str) -> Result<ParentChild> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let link = parent_child_relationships::ActiveModel {
            id: Set(new_id()),
            parent_id: Set(parent_id.to_string()),
            child_id: Set(child_id.to_string()),
            created_at: Set(now_ts()),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建家长关系失败", "Parent-child link already exists"))?;

        set_user_flags(
            &txn,
            parent_id,
            RoleFlagsUpdate {
                is_parents: Some(true),
                ..Default::default()
            },
        )
        .await?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(link.into_parent_child())
    }

    async fn get_parent_child(
        &self,
        parent_id: &str,
        child_id: &str,
    ) -> Result<Option<ParentChild>> {
        let result = parent_child_relationships::Entity::find()
            .filter(parent_child_relationships::Column::ParentId.eq(parent_id))
            .filter(parent_child_relationships::Column::ChildId.eq(child_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询家长关系失败"))?;

        Ok(result.map(|m| m.into_parent_child()))
    }

    async fn list_children(&self, parent_id: &str) -> Result<Vec<ParentChildResponse>> {
        let links = parent_child_relationships::Entity::find()
            .filter(parent_child_relationships::Column::ParentId.eq(parent_id))
            .order_by_asc(parent_child_relationships::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询子女列表失败"))?;

        let child_ids: Vec<String> = links.iter().map(|l| l.child_id.clone()).collect();
        let names: HashMap<String, String> = users::Entity::find()
            .filter(users::Column::Id.is_in(child_ids))
            .all(&self.db)
            .await
            .map_err(db_error("查询子女信息失败"))?
            .into_iter()
            .map(|u| (u.id, format!("{} {}", u.first_name, u.last_name).trim().to_string()))
            .collect();

        Ok(links
            .into_iter()
            .map(|link| ParentChildResponse {
                child_name: names.get(&link.child_id).cloned().unwrap_or_default(),
                id: link.id,
                parent_id: link.parent_id,
                child_id: link.child_id,
                created_at: crate::utils::ts_to_datetime(link.created_at),
            })
            .collect())
    }

    async fn list_child_ids(&self, parent_id: &str) -> Result<Vec<String>> {
        let links = parent_child_relationships::Entity::find()
            .filter(parent_child_relationships::Column::ParentId.eq(parent_id))
            .all(&self.db)
            .await
            .map_err(db_error("查询子女列表失败"))?;

        Ok(links.into_iter().map(|l| l.child_id).collect())
    }

    async fn create_admission_request(
        &self,
        user_id: &str,
        institution_id: &str,
        message: Option<String>,
    ) -> Result<AdmissionRequest> {
        let now = now_ts();
        let result = admission_requests::ActiveModel {
            id: Set(new_id()),
            user_id: Set(user_id.to_string()),
            institution_id: Set(institution_id.to_string()),
            status: Set(AdmissionStatus::Pending.to_string()),
            message: Set(message),
            processed_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error("创建入学申请失败", "Admission request already exists"))?;

        Ok(result.into_admission_request())
    }

    async fn get_admission_request(&self, id: &str) -> Result<Option<AdmissionRequest>> {
        let result = admission_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询入学申请失败"))?;

        Ok(result.map(|m| m.into_admission_request()))
    }

    async fn find_pending_admission_request(
        &self,
        user_id: &str,
        institution_id: &str,
    ) -> Result<Option<AdmissionRequest>> {
        let result = admission_requests::Entity::find()
            .filter(admission_requests::Column::UserId.eq(user_id))
            .filter(admission_requests::Column::InstitutionId.eq(institution_id))
            .filter(admission_requests::Column::Status.eq(AdmissionStatus::Pending.as_str()))
            .one(&self.db)
            .await
            .map_err(db_error("查询入学申请失败"))?;

        Ok(result.map(|m| m.into_admission_request()))
    }

    async fn list_admission_requests_by_user(
        &self,
        user_id: &str,
        status: Option<AdmissionStatus>,
    ) -> Result<Vec<AdmissionRequest>> {
        let mut select = admission_requests::Entity::find()
            .filter(admission_requests::Column::UserId.eq(user_id));
        if let Some(status) = status {
            select = select.filter(admission_requests::Column::Status.eq(status.as_str()));
        }

        let result = select
            .order_by_desc(admission_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询入学申请列表失败"))?;

        Ok(result
            .into_iter()
            .map(|m| m.into_admission_request())
            .collect())
    }

    async fn list_admission_requests_by_institution(
        &self,
        institution_id: &str,
        status: Option<AdmissionStatus>,
    ) -> Result<Vec<AdmissionRequest>> {
        let mut select = admission_requests::Entity::find()
            .filter(admission_requests::Column::InstitutionId.eq(institution_id));
        if let Some(status) = status {
            select = select.filter(admission_requests::Column::Status.eq(status.as_str()));
        }

        let result = select
            .order_by_desc(admission_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询入学申请列表失败"))?;

        Ok(result
            .into_iter()
            .map(|m| m.into_admission_request())
            .collect())
    }

    async fn approve_admission_request(
        &self,
        id: &str,
        processed_by: &str,
    ) -> Result<AdmissionRequest> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let request = admission_requests::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询入学申请失败"))?
            .ok_or_else(|| TutoriaError::not_found("Admission request not found"))?;
        if request.status != AdmissionStatus::Pending.as_str() {
            return Err(TutoriaError::validation(
                "Only pending admission requests can be processed",
            ));
        }

        let user_id = request.user_id.clone();
        let institution_id = request.institution_id.clone();

        let mut model: admission_requests::ActiveModel = request.into();
        model.status = Set(AdmissionStatus::Approved.to_string());
        model.processed_by = Set(Some(processed_by.to_string()));
        model.updated_at = Set(now_ts());
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新入学申请失败"))?;

        insert_membership(&txn, &institution_id, &user_id, MembershipRole::Student).await?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(updated.into_admission_request())
    }

    async fn reject_admission_request(
        &self,
        id: &str,
        processed_by: &str,
    ) -> Result<Option<AdmissionRequest>> {
        let Some(request) = admission_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询入学申请失败"))?
        else {
            return Ok(None);
        };

        let mut model: admission_requests::ActiveModel = request.into();
        model.status = Set(AdmissionStatus::Rejected.to_string());
        model.processed_by = Set(Some(processed_by.to_string()));
        model.updated_at = Set(now_ts());
        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新入学申请失败"))?;

        Ok(Some(updated.into_admission_request()))
    }
}
