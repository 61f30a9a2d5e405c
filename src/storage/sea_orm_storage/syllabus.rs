use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::{SeaOrmStorage, db_error, write_error};
use crate::entity::{syllabi, syllabus_items};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    syllabus::{
        entities::Syllabus,
        requests::{CreateSyllabusRequest, SyllabusFilter, UpdateSyllabusRequest},
    },
};
use crate::storage::SyllabusStorage;
use crate::utils::{new_id, now_ts};

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    syllabus_id: &str,
    node_ids: &[String],
) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    let rows: Vec<_> = node_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .map(|node_id| syllabus_items::ActiveModel {
            id: Set(new_id()),
            syllabus_id: Set(syllabus_id.to_string()),
            node_id: Set(node_id.clone()),
        })
        .collect();
    if rows.is_empty() {
        return Ok(());
    }

    syllabus_items::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(write_error("写入大纲条目失败", "Duplicate syllabus item"))?;
    Ok(())
}

async fn with_items<C: ConnectionTrait>(
    conn: &C,
    models: Vec<syllabi::Model>,
) -> Result<Vec<Syllabus>> {
    let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    if !ids.is_empty() {
        for item in syllabus_items::Entity::find()
            .filter(syllabus_items::Column::SyllabusId.is_in(ids))
            .all(conn)
            .await
            .map_err(db_error("查询大纲条目失败"))?
        {
            grouped.entry(item.syllabus_id).or_default().push(item.node_id);
        }
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let node_ids = grouped.remove(&m.id).unwrap_or_default();
            m.into_syllabus(node_ids)
        })
        .collect())
}

#[async_trait]
impl SyllabusStorage for SeaOrmStorage {
    async fn create_syllabus(
        &self,
        created_by: &str,
        req: CreateSyllabusRequest,
    ) -> Result<Syllabus> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let model = syllabi::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(req.institution_id),
            track_id: Set(req.track_id),
            section_id: Set(req.section_id),
            subject_id: Set(req.subject_id),
            title: Set(req.title.trim().to_string()),
            purpose: Set(req.purpose.to_string()),
            created_by: Set(created_by.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建大纲失败", "Syllabus already exists"))?;

        insert_items(&txn, &model.id, &req.node_ids).await?;
        let result = with_items(&txn, vec![model]).await?.pop();
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        result.ok_or_else(|| TutoriaError::internal_server("Syllabus vanished"))
    }

    async fn get_syllabus(&self, id: &str) -> Result<Option<Syllabus>> {
        let Some(model) = syllabi::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询大纲失败"))?
        else {
            return Ok(None);
        };

        Ok(with_items(&self.db, vec![model]).await?.pop())
    }

    async fn list_syllabi(
        &self,
        filter: SyllabusFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Syllabus>> {
        use syllabi::Column;

        let mut select = syllabi::Entity::find();
        if let Some(ids) = filter.section_ids {
            select = select.filter(Column::SectionId.is_in(ids));
        }
        if let Some(section_id) = filter.section_id {
            select = select.filter(Column::SectionId.eq(section_id));
        }
        if let Some(subject_id) = filter.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(purpose) = filter.purpose {
            select = select.filter(Column::Purpose.eq(purpose.as_str()));
        }
        if filter.only_active {
            select = select.filter(Column::IsActive.eq(true));
        }

        let (page, size) = pagination.normalized();
        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询大纲总数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询大纲列表失败"))?;

        Ok(PaginatedResponse::new(
            with_items(&self.db, models).await?,
            PaginationInfo::new(page, size, total),
        ))
    }

    async fn update_syllabus(
        &self,
        id: &str,
        update: UpdateSyllabusRequest,
    ) -> Result<Option<Syllabus>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = syllabi::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询大纲失败"))?
        else {
            return Ok(None);
        };

        let mut model: syllabi::ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(purpose) = update.purpose {
            model.purpose = Set(purpose.to_string());
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新大纲失败"))?;

        if let Some(ref node_ids) = update.node_ids {
            syllabus_items::Entity::delete_many()
                .filter(syllabus_items::Column::SyllabusId.eq(id))
                .exec(&txn)
                .await
                .map_err(db_error("清除大纲条目失败"))?;
            insert_items(&txn, id, node_ids).await?;
        }

        let result = with_items(&txn, vec![updated]).await?.pop();
        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(result)
    }

    async fn delete_syllabus(&self, id: &str) -> Result<bool> {
        let result = syllabi::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除大纲失败"))?;

        Ok(result.rows_affected > 0)
    }
}
