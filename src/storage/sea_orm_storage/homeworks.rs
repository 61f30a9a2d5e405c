use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::{homework_submissions, homeworks};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    homeworks::{
        entities::{Homework, HomeworkSubmission},
        requests::{
            CreateHomeworkRequest, HomeworkFilter, MarkSubmissionRequest, UpdateHomeworkRequest,
        },
    },
};
use crate::storage::HomeworkStorage;
use crate::utils::{new_id, now_ts};

fn filtered(filter: HomeworkFilter) -> Select<homeworks::Entity> {
    use homeworks::Column;

    let mut select = homeworks::Entity::find();

    // 学生按分组可见，教师按 (分组, 科目) 可见
    if filter.section_ids.is_some() || filter.section_subject_pairs.is_some() {
        let mut scope = Condition::any();
        if let Some(ids) = filter.section_ids
            && !ids.is_empty()
        {
            scope = scope.add(Column::SectionId.is_in(ids));
        }
        for (section_id, subject_id) in filter.section_subject_pairs.unwrap_or_default() {
            scope = scope.add(
                Condition::all()
                    .add(Column::SectionId.eq(section_id))
                    .add(Column::SubjectId.eq(subject_id)),
            );
        }
        if scope.is_empty() {
            scope = scope.add(Column::Id.is_null());
        }
        select = select.filter(scope);
    }

    if let Some(section_id) = filter.section_id {
        select = select.filter(Column::SectionId.eq(section_id));
    }
    if let Some(subject_id) = filter.subject_id {
        select = select.filter(Column::SubjectId.eq(subject_id));
    }
    if let Some(created_by) = filter.created_by {
        select = select.filter(Column::CreatedBy.eq(created_by));
    }
    if filter.only_active {
        select = select.filter(Column::IsActive.eq(true));
    }

    select
        .order_by_desc(Column::DueDate)
        .order_by_desc(Column::CreatedAt)
}

#[async_trait]
impl HomeworkStorage for SeaOrmStorage {
    /// 创建作业
    async fn create_homework(
        &self,
        created_by: &str,
        req: CreateHomeworkRequest,
    ) -> Result<Homework> {
        let now = now_ts();

        let model = homeworks::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(req.institution_id),
            track_id: Set(req.track_id),
            section_id: Set(req.section_id),
            subject_id: Set(req.subject_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            due_date: Set(req.due_date),
            created_by: Set(created_by.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(write_error("创建作业失败", "Homework already exists"))?;

        Ok(result.into_homework())
    }

    /// 通过 ID 获取作业
    async fn get_homework(&self, id: &str) -> Result<Option<Homework>> {
        let result = homeworks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询作业失败"))?;

        Ok(result.map(|m| m.into_homework()))
    }

    async fn list_homeworks(
        &self,
        filter: HomeworkFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Homework>> {
        fetch_page(&self.db, filtered(filter), &pagination, |m| {
            m.into_homework()
        })
        .await
    }

    async fn update_homework(
        &self,
        id: &str,
        update: UpdateHomeworkRequest,
    ) -> Result<Option<Homework>> {
        let Some(existing) = homeworks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询作业失败"))?
        else {
            return Ok(None);
        };

        let mut model: homeworks::ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新作业失败"))?;

        Ok(Some(result.into_homework()))
    }

    /// 删除作业（提交记录级联删除）
    async fn delete_homework(&self, id: &str) -> Result<bool> {
        let result = homeworks::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除作业失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn upsert_submission(
        &self,
        homework_id: &str,
        updated_by: &str,
        req: MarkSubmissionRequest,
    ) -> Result<HomeworkSubmission> {
        let now = now_ts();
        // 未提交时清空提交日期
        let submission_date = if req.submitted {
            req.submission_date
        } else {
            None
        };

        let existing = homework_submissions::Entity::find()
            .filter(homework_submissions::Column::HomeworkId.eq(homework_id))
            .filter(homework_submissions::Column::StudentId.eq(req.student_id.as_str()))
            .one(&self.db)
            .await
            .map_err(db_error("查询作业提交失败"))?;

        let result = match existing {
            Some(existing) => {
                let mut model: homework_submissions::ActiveModel = existing.into();
                model.submitted = Set(req.submitted);
                model.submission_date = Set(submission_date);
                model.updated_by = Set(updated_by.to_string());
                model.updated_at = Set(now);
                model
                    .update(&self.db)
                    .await
                    .map_err(db_error("更新作业提交失败"))?
            }
            None => homework_submissions::ActiveModel {
                id: Set(new_id()),
                homework_id: Set(homework_id.to_string()),
                student_id: Set(req.student_id),
                submitted: Set(req.submitted),
                submission_date: Set(submission_date),
                updated_by: Set(updated_by.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await
            .map_err(write_error("创建作业提交失败", "Submission already recorded"))?,
        };

        Ok(result.into_submission())
    }

    async fn list_submissions(
        &self,
        homework_id: &str,
        student_ids: Option<Vec<String>>,
    ) -> Result<Vec<HomeworkSubmission>> {
        let mut select = homework_submissions::Entity::find()
            .filter(homework_submissions::Column::HomeworkId.eq(homework_id));
        if let Some(ids) = student_ids {
            select = select.filter(homework_submissions::Column::StudentId.is_in(ids));
        }

        let result = select
            .order_by_asc(homework_submissions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询作业提交失败"))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }
}
