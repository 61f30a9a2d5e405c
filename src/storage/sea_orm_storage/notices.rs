use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::notices::{ActiveModel, Column, Entity as Notices};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    notices::{
        entities::Notice,
        requests::{CreateNoticeRequest, NoticeFilter, UpdateNoticeRequest},
    },
};
use crate::storage::NoticeStorage;
use crate::utils::{new_id, now_ts};

#[async_trait]
impl NoticeStorage for SeaOrmStorage {
    async fn create_notice(&self, created_by: &str, req: CreateNoticeRequest) -> Result<Notice> {
        let now = now_ts();
        let result = ActiveModel {
            id: Set(new_id()),
            institution_id: Set(req.institution_id),
            title: Set(req.title.trim().to_string()),
            content: Set(req.content),
            target_audience: Set(req.target_audience.to_string()),
            notice_type: Set(req.notice_type.to_string()),
            created_by: Set(created_by.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error("创建通知失败", "Notice already exists"))?;

        Ok(result.into_notice())
    }

    async fn get_notice(&self, id: &str) -> Result<Option<Notice>> {
        let result = Notices::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询通知失败"))?;

        Ok(result.map(|m| m.into_notice()))
    }

    async fn list_notices(
        &self,
        filter: NoticeFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Notice>> {
        // 每个机构按该用户可见的受众过滤，没有任何范围时返回空
        let mut scope = Condition::any();
        for (institution_id, audiences) in filter.scopes {
            if audiences.is_empty() {
                continue;
            }
            scope = scope.add(
                Condition::all()
                    .add(Column::InstitutionId.eq(institution_id))
                    .add(Column::TargetAudience.is_in(audiences.iter().map(|a| a.as_str()))),
            );
        }
        if scope.is_empty() {
            scope = scope.add(Column::Id.is_null());
        }

        let mut select = Notices::find().filter(scope);
        if let Some(notice_type) = filter.notice_type {
            select = select.filter(Column::NoticeType.eq(notice_type.as_str()));
        }
        if !filter.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }

        let select = select.order_by_desc(Column::CreatedAt);
        fetch_page(&self.db, select, &pagination, |m| m.into_notice()).await
    }

    async fn update_notice(&self, id: &str, update: UpdateNoticeRequest) -> Result<Option<Notice>> {
        let Some(existing) = Notices::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询通知失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(audience) = update.target_audience {
            model.target_audience = Set(audience.to_string());
        }
        if let Some(notice_type) = update.notice_type {
            model.notice_type = Set(notice_type.to_string());
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新通知失败"))?;

        Ok(Some(result.into_notice()))
    }

    async fn delete_notice(&self, id: &str) -> Result<bool> {
        let result = Notices::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除通知失败"))?;

        Ok(result.rows_affected > 0)
    }
}
