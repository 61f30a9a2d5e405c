use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::{curriculum_nodes, global_curriculum_items, sections};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    curriculum::{
        entities::{CurriculumLevel, CurriculumNode, GlobalCurriculumItem, Section},
        requests::{
            CreateGlobalItemRequest, CreateSectionRequest, GlobalItemListParams, NewNode,
            NodeFilter, UpdateGlobalItemRequest, UpdateNodeRequest, UpdateSectionRequest,
        },
    },
};
use crate::storage::CurriculumStorage;
use crate::utils::{escape_like_pattern, new_id, now_ts};

fn node_select(level: Option<CurriculumLevel>, filter: NodeFilter) -> Select<curriculum_nodes::Entity> {
    use curriculum_nodes::Column;

    let mut select = curriculum_nodes::Entity::find();
    if let Some(level) = level {
        select = select.filter(Column::Level.eq(level.as_str()));
    }
    if let Some(ids) = filter.institution_ids {
        select = select.filter(Column::InstitutionId.is_in(ids));
    }
    if let Some(parent_id) = filter.parent_id {
        select = select.filter(Column::ParentId.eq(parent_id));
    }
    if let Some(track_id) = filter.track_id {
        select = select.filter(Column::TrackId.eq(track_id));
    }
    if let Some(section_id) = filter.section_id {
        // 未绑定分组的节点对所有分组可见
        select = select.filter(
            Condition::any()
                .add(Column::SectionId.eq(section_id))
                .add(Column::SectionId.is_null()),
        );
    }
    if let Some(ids) = filter.ids {
        select = select.filter(Column::Id.is_in(ids));
    }
    select
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::Name)
}

#[async_trait]
impl CurriculumStorage for SeaOrmStorage {
    async fn create_global_item(
        &self,
        level: CurriculumLevel,
        req: CreateGlobalItemRequest,
    ) -> Result<GlobalCurriculumItem> {
        let now = now_ts();
        let result = global_curriculum_items::ActiveModel {
            id: Set(new_id()),
            level: Set(level.to_string()),
            name: Set(req.name.trim().to_string()),
            code: Set(req.code),
            description: Set(req.description),
            content: Set(req.content),
            content_type: Set(req.content_type.map(|c| c.to_string())),
            video_url: Set(req.video_url),
            image_url: Set(req.image_url),
            institution_type: Set(req.institution_type.to_string()),
            is_active: Set(req.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error("创建课程目录失败", "Catalog item already exists"))?;

        Ok(result.into_global_item())
    }

    async fn get_global_item(&self, id: &str) -> Result<Option<GlobalCurriculumItem>> {
        let result = global_curriculum_items::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询课程目录失败"))?;

        Ok(result.map(|m| m.into_global_item()))
    }

    async fn list_global_items(
        &self,
        level: CurriculumLevel,
        params: GlobalItemListParams,
    ) -> Result<PaginatedResponse<GlobalCurriculumItem>> {
        use global_curriculum_items::Column;

        let mut select = global_curriculum_items::Entity::find()
            .filter(Column::Level.eq(level.as_str()));

        if let Some(kind) = params.institution_type {
            select = select.filter(Column::InstitutionType.eq(kind.as_str()));
        }
        if let Some(is_active) = params.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Code.contains(&escaped)),
            );
        }

        let select = select.order_by_asc(Column::Name);
        fetch_page(&self.db, select, &params.pagination, |m| m.into_global_item()).await
    }

    async fn update_global_item(
        &self,
        id: &str,
        update: UpdateGlobalItemRequest,
    ) -> Result<Option<GlobalCurriculumItem>> {
        let Some(existing) = global_curriculum_items::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询课程目录失败"))?
        else {
            return Ok(None);
        };

        let mut model: global_curriculum_items::ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(Some(code));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(content) = update.content {
            model.content = Set(Some(content));
        }
        if let Some(content_type) = update.content_type {
            model.content_type = Set(Some(content_type.to_string()));
        }
        if let Some(video_url) = update.video_url {
            model.video_url = Set(Some(video_url));
        }
        if let Some(image_url) = update.image_url {
            model.image_url = Set(Some(image_url));
        }
        if let Some(kind) = update.institution_type {
            model.institution_type = Set(kind.to_string());
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新课程目录失败"))?;

        Ok(Some(result.into_global_item()))
    }

    async fn delete_global_item(&self, id: &str) -> Result<bool> {
        let result = global_curriculum_items::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_error("删除课程目录失败", "Catalog item is still in use"))?;

        Ok(result.rows_affected > 0)
    }

    async fn create_node(&self, node: NewNode) -> Result<CurriculumNode> {
        let now = now_ts();
        let id = new_id();
        // track 节点的 track_id 指向自身
        let track_id = node.track_id.unwrap_or_else(|| id.clone());

        let result = curriculum_nodes::ActiveModel {
            id: Set(id),
            institution_id: Set(node.institution_id),
            level: Set(node.level.to_string()),
            parent_id: Set(node.parent_id),
            track_id: Set(track_id),
            section_id: Set(node.section_id),
            global_item_id: Set(node.global_item_id),
            name: Set(node.name),
            sort_order: Set(node.order),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error("创建课程节点失败", "Curriculum node already exists"))?;

        Ok(result.into_node())
    }

    async fn get_node(&self, id: &str) -> Result<Option<CurriculumNode>> {
        let result = curriculum_nodes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询课程节点失败"))?;

        Ok(result.map(|m| m.into_node()))
    }

    async fn list_nodes(
        &self,
        level: CurriculumLevel,
        filter: NodeFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<CurriculumNode>> {
        let select = node_select(Some(level), filter);
        fetch_page(&self.db, select, &pagination, |m| m.into_node()).await
    }

    async fn list_all_nodes(
        &self,
        level: Option<CurriculumLevel>,
        filter: NodeFilter,
    ) -> Result<Vec<CurriculumNode>> {
        let result = node_select(level, filter)
            .all(&self.db)
            .await
            .map_err(db_error("查询课程节点失败"))?;

        Ok(result.into_iter().map(|m| m.into_node()).collect())
    }

    async fn update_node(
        &self,
        id: &str,
        update: UpdateNodeRequest,
    ) -> Result<Option<CurriculumNode>> {
        let Some(existing) = curriculum_nodes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询课程节点失败"))?
        else {
            return Ok(None);
        };

        let mut model: curriculum_nodes::ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(order) = update.order {
            model.sort_order = Set(order);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新课程节点失败"))?;

        Ok(Some(result.into_node()))
    }

    async fn delete_node(&self, id: &str) -> Result<bool> {
        let result = curriculum_nodes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_error("删除课程节点失败", "Curriculum node is still in use"))?;

        Ok(result.rows_affected > 0)
    }

    async fn create_section(&self, req: CreateSectionRequest) -> Result<Section> {
        let now = now_ts();
        let result = sections::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(req.institution_id),
            track_id: Set(req.track_id),
            name: Set(req.name.trim().to_string()),
            sort_order: Set(req.order),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error(
            "创建分组失败",
            "A section with this name already exists in the track",
        ))?;

        Ok(result.into_section())
    }

    async fn get_section(&self, id: &str) -> Result<Option<Section>> {
        let result = sections::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询分组失败"))?;

        Ok(result.map(|m| m.into_section()))
    }

    async fn get_sections_by_ids(&self, ids: &[String]) -> Result<Vec<Section>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = sections::Entity::find()
            .filter(sections::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_error("查询分组失败"))?;

        Ok(result.into_iter().map(|m| m.into_section()).collect())
    }

    async fn list_sections(
        &self,
        institution_id: &str,
        track_id: Option<&str>,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Section>> {
        let mut select =
            sections::Entity::find().filter(sections::Column::InstitutionId.eq(institution_id));
        if let Some(track_id) = track_id {
            select = select.filter(sections::Column::TrackId.eq(track_id));
        }
        let select = select
            .order_by_asc(sections::Column::SortOrder)
            .order_by_asc(sections::Column::Name);

        fetch_page(&self.db, select, &pagination, |m| m.into_section()).await
    }

    async fn update_section(
        &self,
        id: &str,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        let Some(existing) = sections::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询分组失败"))?
        else {
            return Ok(None);
        };

        let mut model: sections::ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(order) = update.order {
            model.sort_order = Set(order);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let result = model.update(&self.db).await.map_err(write_error(
            "更新分组失败",
            "A section with this name already exists in the track",
        ))?;

        Ok(Some(result.into_section()))
    }

    async fn delete_section(&self, id: &str) -> Result<bool> {
        let result = sections::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_error("删除分组失败", "Section is still in use"))?;

        Ok(result.rows_affected > 0)
    }
}
