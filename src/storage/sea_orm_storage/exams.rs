use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::{exam_marks, exams};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    exams::{
        entities::{Exam, ExamMark},
        requests::{
            CreateExamMarkRequest, CreateExamRequest, ExamFilter, UpdateExamMarkRequest,
            UpdateExamRequest,
        },
    },
};
use crate::storage::ExamStorage;
use crate::utils::{new_id, now_ts};

fn filtered(filter: ExamFilter) -> Select<exams::Entity> {
    use exams::Column;

    let mut select = exams::Entity::find();
    if let Some(ids) = filter.section_ids {
        select = select.filter(Column::SectionId.is_in(ids));
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
        .order_by_desc(Column::ExamDate)
        .order_by_desc(Column::CreatedAt)
}

#[async_trait]
impl ExamStorage for SeaOrmStorage {
    async fn create_exam(&self, created_by: &str, req: CreateExamRequest) -> Result<Exam> {
        let now = now_ts();
        let result = exams::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(req.institution_id),
            track_id: Set(req.track_id),
            section_id: Set(req.section_id),
            subject_id: Set(req.subject_id),
            title: Set(req.title.trim().to_string()),
            exam_type: Set(req.exam_type.to_string()),
            exam_date: Set(req.exam_date),
            total_marks: Set(req.total_marks),
            is_active: Set(true),
            created_by: Set(created_by.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error("创建考试失败", "Exam already exists"))?;

        Ok(result.into_exam())
    }

    async fn get_exam(&self, id: &str) -> Result<Option<Exam>> {
        let result = exams::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询考试失败"))?;

        Ok(result.map(|m| m.into_exam()))
    }

    async fn get_exams_by_ids(&self, ids: &[String]) -> Result<Vec<Exam>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = exams::Entity::find()
            .filter(exams::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_error("批量查询考试失败"))?;

        Ok(result.into_iter().map(|m| m.into_exam()).collect())
    }

    async fn list_exams(
        &self,
        filter: ExamFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Exam>> {
        fetch_page(&self.db, filtered(filter), &pagination, |m| m.into_exam()).await
    }

    async fn update_exam(&self, id: &str, update: UpdateExamRequest) -> Result<Option<Exam>> {
        let Some(existing) = exams::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询考试失败"))?
        else {
            return Ok(None);
        };

        let mut model: exams::ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(exam_type) = update.exam_type {
            model.exam_type = Set(exam_type.to_string());
        }
        if let Some(exam_date) = update.exam_date {
            model.exam_date = Set(exam_date);
        }
        if let Some(total_marks) = update.total_marks {
            model.total_marks = Set(total_marks);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新考试失败"))?;

        Ok(Some(result.into_exam()))
    }

    async fn delete_exam(&self, id: &str) -> Result<bool> {
        let result = exams::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除考试失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn create_exam_mark(
        &self,
        created_by: &str,
        req: CreateExamMarkRequest,
    ) -> Result<ExamMark> {
        let now = now_ts();
        let result = exam_marks::ActiveModel {
            id: Set(new_id()),
            exam_id: Set(req.exam_id),
            student_id: Set(req.student_id),
            marks_obtained: Set(req.marks_obtained),
            remarks: Set(req.remarks),
            created_by: Set(created_by.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error(
            "录入成绩失败",
            "Marks already recorded for this student",
        ))?;

        Ok(result.into_exam_mark())
    }

    async fn get_exam_mark(&self, id: &str) -> Result<Option<ExamMark>> {
        let result = exam_marks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询成绩失败"))?;

        Ok(result.map(|m| m.into_exam_mark()))
    }

    async fn find_exam_mark(&self, exam_id: &str, student_id: &str) -> Result<Option<ExamMark>> {
        let result = exam_marks::Entity::find()
            .filter(exam_marks::Column::ExamId.eq(exam_id))
            .filter(exam_marks::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询成绩失败"))?;

        Ok(result.map(|m| m.into_exam_mark()))
    }

    async fn list_exam_marks(
        &self,
        exam_id: Option<&str>,
        student_ids: Option<Vec<String>>,
    ) -> Result<Vec<ExamMark>> {
        let mut select = exam_marks::Entity::find();
        if let Some(exam_id) = exam_id {
            select = select.filter(exam_marks::Column::ExamId.eq(exam_id));
        }
        if let Some(ids) = student_ids {
            select = select.filter(exam_marks::Column::StudentId.is_in(ids));
        }

        let result = select
            .order_by_asc(exam_marks::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询成绩列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_exam_mark()).collect())
    }

    async fn update_exam_mark(
        &self,
        id: &str,
        update: UpdateExamMarkRequest,
    ) -> Result<Option<ExamMark>> {
        let Some(existing) = exam_marks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询成绩失败"))?
        else {
            return Ok(None);
        };

        let mut model: exam_marks::ActiveModel = existing.into();
        if let Some(marks) = update.marks_obtained {
            model.marks_obtained = Set(marks);
        }
        if let Some(remarks) = update.remarks {
            model.remarks = Set(Some(remarks));
        }
        model.updated_at = Set(now_ts());

        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新成绩失败"))?;

        Ok(Some(result.into_exam_mark()))
    }

    async fn delete_exam_mark(&self, id: &str) -> Result<bool> {
        let result = exam_marks::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除成绩失败"))?;

        Ok(result.rows_affected > 0)
    }
}
