use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Select, Set, TransactionTrait,
};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::{student_enrollments, teacher_enrollment_links, teacher_enrollments, users};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    enrollments::{
        entities::{EnrollmentTarget, StudentEnrollment, TeacherEnrollment},
        requests::{
            CreateStudentEnrollmentRequest, CreateTeacherEnrollmentRequest, EnrollmentFilter,
            UpdateStudentEnrollmentRequest, UpdateTeacherEnrollmentRequest,
        },
        responses::SectionStudentResponse,
    },
};
use crate::storage::EnrollmentStorage;
use crate::utils::{new_id, now_ts};

/// 按授课目标写入关联行
async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    enrollment_id: &str,
    kind: EnrollmentTarget,
    target_ids: &[String],
) -> Result<()> {
    if target_ids.is_empty() {
        return Ok(());
    }
    let mut seen = std::collections::HashSet::new();
    let rows: Vec<_> = target_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .map(|target_id| teacher_enrollment_links::ActiveModel {
            id: Set(new_id()),
            enrollment_id: Set(enrollment_id.to_string()),
            target_kind: Set(kind.to_string()),
            target_id: Set(target_id.clone()),
        })
        .collect();

    teacher_enrollment_links::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(db_error("写入授课范围失败"))?;
    Ok(())
}

async fn replace_links<C: ConnectionTrait>(
    conn: &C,
    enrollment_id: &str,
    kind: EnrollmentTarget,
    target_ids: &[String],
) -> Result<()> {
    teacher_enrollment_links::Entity::delete_many()
        .filter(teacher_enrollment_links::Column::EnrollmentId.eq(enrollment_id))
        .filter(teacher_enrollment_links::Column::TargetKind.eq(kind.as_str()))
        .exec(conn)
        .await
        .map_err(db_error("清除授课范围失败"))?;
    insert_links(conn, enrollment_id, kind, target_ids).await
}

/// 查询授课关系并合并关联目标
async fn with_links<C: ConnectionTrait>(
    conn: &C,
    models: Vec<teacher_enrollments::Model>,
) -> Result<Vec<TeacherEnrollment>> {
    let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
    let mut grouped: HashMap<String, Vec<teacher_enrollment_links::Model>> = HashMap::new();
    if !ids.is_empty() {
        let links = teacher_enrollment_links::Entity::find()
            .filter(teacher_enrollment_links::Column::EnrollmentId.is_in(ids))
            .all(conn)
            .await
            .map_err(db_error("查询授课范围失败"))?;
        for link in links {
            grouped
                .entry(link.enrollment_id.clone())
                .or_default()
                .push(link);
        }
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let links = grouped.remove(&m.id).unwrap_or_default();
            m.into_teacher_enrollment(links)
        })
        .collect())
}

fn teacher_select(filter: &EnrollmentFilter) -> Select<teacher_enrollments::Entity> {
    use teacher_enrollments::Column;

    let mut select = teacher_enrollments::Entity::find();
    if let Some(ref ids) = filter.institution_ids {
        select = select.filter(Column::InstitutionId.is_in(ids.clone()));
    }
    if let Some(ref user_id) = filter.user_id {
        select = select.filter(Column::UserId.eq(user_id.as_str()));
    }
    if filter.only_active {
        select = select.filter(Column::IsActive.eq(true));
    }

    // track / section 条件通过关联表子查询
    for (kind, target) in [
        (EnrollmentTarget::Track, &filter.track_id),
        (EnrollmentTarget::Section, &filter.section_id),
    ] {
        if let Some(target_id) = target {
            select = select.filter(
                Column::Id.in_subquery(
                    teacher_enrollment_links::Entity::find()
                        .select_only()
                        .column(teacher_enrollment_links::Column::EnrollmentId)
                        .filter(teacher_enrollment_links::Column::TargetKind.eq(kind.as_str()))
                        .filter(teacher_enrollment_links::Column::TargetId.eq(target_id.as_str()))
                        .into_query(),
                ),
            );
        }
    }

    select.order_by_desc(Column::CreatedAt)
}

fn student_select(filter: EnrollmentFilter) -> Select<student_enrollments::Entity> {
    use student_enrollments::Column;

    let mut select = student_enrollments::Entity::find();
    if let Some(ids) = filter.institution_ids {
        select = select.filter(Column::InstitutionId.is_in(ids));
    }
    if let Some(user_id) = filter.user_id {
        select = select.filter(Column::UserId.eq(user_id));
    }
    if let Some(track_id) = filter.track_id {
        select = select.filter(Column::TrackId.eq(track_id));
    }
    if let Some(section_id) = filter.section_id {
        select = select.filter(Column::SectionId.eq(section_id));
    }
    if filter.only_active {
        select = select.filter(Column::IsActive.eq(true));
    }
    select.order_by_desc(Column::CreatedAt)
}

#[async_trait]
impl EnrollmentStorage for SeaOrmStorage {
    async fn create_teacher_enrollment(
        &self,
        req: CreateTeacherEnrollmentRequest,
    ) -> Result<TeacherEnrollment> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let enrollment = teacher_enrollments::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(req.institution_id),
            user_id: Set(req.user_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建教师授课关系失败", "Teacher enrollment already exists"))?;

        insert_links(&txn, &enrollment.id, EnrollmentTarget::Track, &req.track_ids).await?;
        insert_links(&txn, &enrollment.id, EnrollmentTarget::Section, &req.section_ids).await?;
        insert_links(&txn, &enrollment.id, EnrollmentTarget::Subject, &req.subject_ids).await?;

        let mut result = with_links(&txn, vec![enrollment]).await?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        result
            .pop()
            .ok_or_else(|| TutoriaError::internal_server("Teacher enrollment vanished"))
    }

    async fn get_teacher_enrollment(&self, id: &str) -> Result<Option<TeacherEnrollment>> {
        let Some(model) = teacher_enrollments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询教师授课关系失败"))?
        else {
            return Ok(None);
        };

        Ok(with_links(&self.db, vec![model]).await?.pop())
    }

    async fn list_teacher_enrollments(
        &self,
        filter: EnrollmentFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<TeacherEnrollment>> {
        let (page, size) = pagination.normalized();
        let paginator = teacher_select(&filter).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询教师授课关系总数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询教师授课关系失败"))?;

        let items = with_links(&self.db, models).await?;
        Ok(PaginatedResponse::new(
            items,
            PaginationInfo::new(page, size, total),
        ))
    }

    async fn list_active_teacher_enrollments(
        &self,
        user_id: &str,
        institution_id: Option<&str>,
    ) -> Result<Vec<TeacherEnrollment>> {
        let filter = EnrollmentFilter {
            institution_ids: institution_id.map(|id| vec![id.to_string()]),
            user_id: Some(user_id.to_string()),
            only_active: true,
            ..Default::default()
        };
        let models = teacher_select(&filter)
            .all(&self.db)
            .await
            .map_err(db_error("查询教师授课关系失败"))?;

        with_links(&self.db, models).await
    }

    async fn update_teacher_enrollment(
        &self,
        id: &str,
        update: UpdateTeacherEnrollmentRequest,
    ) -> Result<Option<TeacherEnrollment>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = teacher_enrollments::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询教师授课关系失败"))?
        else {
            return Ok(None);
        };

        if let Some(ref ids) = update.track_ids {
            replace_links(&txn, id, EnrollmentTarget::Track, ids).await?;
        }
        if let Some(ref ids) = update.section_ids {
            replace_links(&txn, id, EnrollmentTarget::Section, ids).await?;
        }
        if let Some(ref ids) = update.subject_ids {
            replace_links(&txn, id, EnrollmentTarget::Subject, ids).await?;
        }

        let mut model: teacher_enrollments::ActiveModel = existing.into();
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新教师授课关系失败"))?;

        let result = with_links(&txn, vec![updated]).await?.pop();
        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(result)
    }

    async fn delete_teacher_enrollment(&self, id: &str) -> Result<bool> {
        let result = teacher_enrollments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除教师授课关系失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn create_student_enrollment(
        &self,
        req: CreateStudentEnrollmentRequest,
    ) -> Result<StudentEnrollment> {
        let now = now_ts();
        let result = student_enrollments::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(req.institution_id),
            user_id: Set(req.user_id),
            track_id: Set(req.track_id),
            section_id: Set(req.section_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error(
            "创建学生入学关系失败",
            "Student is already enrolled in this section",
        ))?;

        Ok(result.into_student_enrollment())
    }

    async fn get_student_enrollment(&self, id: &str) -> Result<Option<StudentEnrollment>> {
        let result = student_enrollments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询学生入学关系失败"))?;

        Ok(result.map(|m| m.into_student_enrollment()))
    }

    async fn list_student_enrollments(
        &self,
        filter: EnrollmentFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<StudentEnrollment>> {
        fetch_page(&self.db, student_select(filter), &pagination, |m| {
            m.into_student_enrollment()
        })
        .await
    }

    async fn list_all_student_enrollments(
        &self,
        filter: EnrollmentFilter,
    ) -> Result<Vec<StudentEnrollment>> {
        let result = student_select(filter)
            .all(&self.db)
            .await
            .map_err(db_error("查询学生入学关系失败"))?;

        Ok(result
            .into_iter()
            .map(|m| m.into_student_enrollment())
            .collect())
    }

    async fn update_student_enrollment(
        &self,
        id: &str,
        update: UpdateStudentEnrollmentRequest,
    ) -> Result<Option<StudentEnrollment>> {
        let Some(existing) = student_enrollments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询学生入学关系失败"))?
        else {
            return Ok(None);
        };

        let mut model: student_enrollments::ActiveModel = existing.into();
        if let Some(track_id) = update.track_id {
            model.track_id = Set(track_id);
        }
        if let Some(section_id) = update.section_id {
            model.section_id = Set(section_id);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(now_ts());

        let result = model.update(&self.db).await.map_err(write_error(
            "更新学生入学关系失败",
            "Student is already enrolled in this section",
        ))?;

        Ok(Some(result.into_student_enrollment()))
    }

    async fn delete_student_enrollment(&self, id: &str) -> Result<bool> {
        let result = student_enrollments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除学生入学关系失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn list_section_students(&self, section_id: &str) -> Result<Vec<SectionStudentResponse>> {
        let rows = student_enrollments::Entity::find()
            .filter(student_enrollments::Column::SectionId.eq(section_id))
            .filter(student_enrollments::Column::IsActive.eq(true))
            .find_also_related(users::Entity)
            .order_by_asc(users::Column::FirstName)
            .all(&self.db)
            .await
            .map_err(db_error("查询分组学生失败"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, user)| {
                Some(SectionStudentResponse {
                    enrollment_id: enrollment.id,
                    student: user?.into_user(),
                })
            })
            .collect())
    }
}
