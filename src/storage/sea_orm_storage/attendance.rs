use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, Set, TransactionTrait,
};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::attendances::{ActiveModel, Column, Entity as Attendances};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    attendance::{
        entities::{Attendance, AttendanceStatus},
        requests::{AttendanceFilter, NewAttendance},
    },
};
use crate::storage::AttendanceStorage;
use crate::utils::{new_id, now_ts};

const DUPLICATE: &str = "Attendance already recorded for this student on this date";

fn new_row(row: NewAttendance, now: i64) -> ActiveModel {
    ActiveModel {
        id: Set(new_id()),
        institution_id: Set(row.institution_id),
        student_id: Set(row.student_id),
        section_id: Set(row.section_id),
        subject_id: Set(row.subject_id),
        date: Set(row.date),
        status: Set(row.status.to_string()),
        created_by: Set(row.created_by),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn filtered(filter: AttendanceFilter) -> Select<Attendances> {
    let mut select = Attendances::find();

    // 可见范围：教师的 (分组, 科目) 或学生 id 集合，二者任一命中
    let mut scope = Condition::any();
    let mut scoped = false;
    if let Some(pairs) = filter.section_subject_pairs {
        scoped = true;
        for (section_id, subject_id) in pairs {
            scope = scope.add(
                Condition::all()
                    .add(Column::SectionId.eq(section_id))
                    .add(Column::SubjectId.eq(subject_id)),
            );
        }
    }
    if let Some(student_ids) = filter.student_ids {
        scoped = true;
        scope = scope.add(Column::StudentId.is_in(student_ids));
    }
    if scoped {
        // 空集合不匹配任何记录
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
    if let Some(student_id) = filter.student_id {
        select = select.filter(Column::StudentId.eq(student_id));
    }
    if let Some(date) = filter.date {
        select = select.filter(Column::Date.eq(date));
    }
    if let Some(from) = filter.date_from {
        select = select.filter(Column::Date.gte(from));
    }
    if let Some(to) = filter.date_to {
        select = select.filter(Column::Date.lte(to));
    }

    select
        .order_by_desc(Column::Date)
        .order_by_asc(Column::StudentId)
}

#[async_trait]
impl AttendanceStorage for SeaOrmStorage {
    async fn create_attendance(&self, attendance: NewAttendance) -> Result<Attendance> {
        let result = new_row(attendance, now_ts())
            .insert(&self.db)
            .await
            .map_err(write_error("创建考勤失败", DUPLICATE))?;

        Ok(result.into_attendance())
    }

    async fn bulk_create_attendance(&self, rows: Vec<NewAttendance>) -> Result<Vec<Attendance>> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let model = new_row(row, now)
                .insert(&txn)
                .await
                .map_err(write_error("批量创建考勤失败", DUPLICATE))?;
            created.push(model.into_attendance());
        }

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(created)
    }

    async fn find_marked_students(
        &self,
        section_id: &str,
        subject_id: &str,
        date: &str,
        student_ids: &[String],
    ) -> Result<Vec<String>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let marked: Vec<String> = Attendances::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::SectionId.eq(section_id))
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::Date.eq(date))
            .filter(Column::StudentId.is_in(student_ids.iter().cloned()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error("查询已考勤学生失败"))?;

        Ok(marked)
    }

    async fn get_attendance(&self, id: &str) -> Result<Option<Attendance>> {
        let result = Attendances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询考勤失败"))?;

        Ok(result.map(|m| m.into_attendance()))
    }

    async fn list_attendance(
        &self,
        filter: AttendanceFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Attendance>> {
        fetch_page(&self.db, filtered(filter), &pagination, |m| {
            m.into_attendance()
        })
        .await
    }

    async fn list_all_attendance(&self, filter: AttendanceFilter) -> Result<Vec<Attendance>> {
        let result = filtered(filter)
            .all(&self.db)
            .await
            .map_err(db_error("查询考勤列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_attendance()).collect())
    }

    async fn update_attendance_status(
        &self,
        id: &str,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>> {
        let Some(existing) = Attendances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询考勤失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(status.to_string());
        model.updated_at = Set(now_ts());
        let result = model
            .update(&self.db)
            .await
            .map_err(db_error("更新考勤失败"))?;

        Ok(Some(result.into_attendance()))
    }

    async fn delete_attendance(&self, id: &str) -> Result<bool> {
        let result = Attendances::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除考勤失败"))?;

        Ok(result.rows_affected > 0)
    }
}
