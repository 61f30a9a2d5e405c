use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait, sea_query::Expr,
};

use super::{SeaOrmStorage, db_error, fetch_page, write_error};
use crate::entity::{quiz_attempts, quiz_items, quiz_options, quiz_questions, quiz_responses, quizzes};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    quiz::{
        entities::{AttemptStatus, PublishStatus, Quiz, QuizAttempt, QuizQuestion, QuizResponse},
        requests::{
            AttemptFilter, CreateQuestionRequest, NewQuiz, OptionInput, QuestionListParams,
            QuizListParams, ResponseDraft, UpdateQuestionRequest, UpdateQuizRequest,
        },
    },
};
use crate::storage::{AttemptScorer, QuizStorage};
use crate::utils::{escape_like_pattern, new_id, now_ts};

async fn insert_options<C: ConnectionTrait>(
    conn: &C,
    question_id: &str,
    options: Vec<OptionInput>,
) -> Result<()> {
    if options.is_empty() {
        return Ok(());
    }
    let rows: Vec<_> = options
        .into_iter()
        .map(|o| quiz_options::ActiveModel {
            id: Set(new_id()),
            question_id: Set(question_id.to_string()),
            label: Set(o.label.to_string()),
            text: Set(o.text.trim().to_string()),
            is_correct: Set(o.is_correct),
        })
        .collect();

    quiz_options::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(write_error("写入题目选项失败", "Duplicate option label"))?;
    Ok(())
}

/// 题目附带选项
async fn with_options<C: ConnectionTrait>(
    conn: &C,
    models: Vec<quiz_questions::Model>,
) -> Result<Vec<QuizQuestion>> {
    let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
    let mut grouped: HashMap<String, Vec<quiz_options::Model>> = HashMap::new();
    if !ids.is_empty() {
        for option in quiz_options::Entity::find()
            .filter(quiz_options::Column::QuestionId.is_in(ids))
            .all(conn)
            .await
            .map_err(db_error("查询题目选项失败"))?
        {
            grouped
                .entry(option.question_id.clone())
                .or_default()
                .push(option);
        }
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let options = grouped.remove(&m.id).unwrap_or_default();
            m.into_question(options)
        })
        .collect())
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    quiz_id: &str,
    question_ids: &[String],
) -> Result<()> {
    if question_ids.is_empty() {
        return Ok(());
    }
    let rows: Vec<_> = question_ids
        .iter()
        .enumerate()
        .map(|(i, question_id)| quiz_items::ActiveModel {
            id: Set(new_id()),
            quiz_id: Set(quiz_id.to_string()),
            question_id: Set(question_id.clone()),
            sort_order: Set(i as i32),
        })
        .collect();

    quiz_items::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(write_error("写入测验题目失败", "Duplicate question in quiz"))?;
    Ok(())
}

/// 测验附带按顺序排列的题目 id
async fn with_items<C: ConnectionTrait>(
    conn: &C,
    models: Vec<quizzes::Model>,
) -> Result<Vec<Quiz>> {
    let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    if !ids.is_empty() {
        for item in quiz_items::Entity::find()
            .filter(quiz_items::Column::QuizId.is_in(ids))
            .order_by_asc(quiz_items::Column::SortOrder)
            .all(conn)
            .await
            .map_err(db_error("查询测验题目失败"))?
        {
            grouped.entry(item.quiz_id).or_default().push(item.question_id);
        }
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let question_ids = grouped.remove(&m.id).unwrap_or_default();
            m.into_quiz(question_ids)
        })
        .collect())
}

async fn page_quizzes(
    storage: &SeaOrmStorage,
    select: Select<quizzes::Entity>,
    pagination: &PaginationQuery,
) -> Result<PaginatedResponse<Quiz>> {
    let (page, size) = pagination.normalized();
    let paginator = select.paginate(&storage.db, size);
    let total = paginator
        .num_items()
        .await
        .map_err(db_error("查询测验总数失败"))?;
    let models = paginator
        .fetch_page(page - 1)
        .await
        .map_err(db_error("查询测验列表失败"))?;

    Ok(PaginatedResponse::new(
        with_items(&storage.db, models).await?,
        PaginationInfo::new(page, size, total),
    ))
}

fn quiz_list_select(params: &QuizListParams) -> Select<quizzes::Entity> {
    let mut select = quizzes::Entity::find();
    if let Some(status) = params.status {
        select = select.filter(quizzes::Column::Status.eq(status.as_str()));
    }
    if let Some(ref subject_id) = params.subject_id {
        select = select.filter(quizzes::Column::SubjectId.eq(subject_id.as_str()));
    }
    select
        .order_by_asc(quizzes::Column::SortOrder)
        .order_by_desc(quizzes::Column::CreatedAt)
}

fn attempt_select(filter: AttemptFilter) -> Select<quiz_attempts::Entity> {
    use quiz_attempts::Column;

    let mut select = quiz_attempts::Entity::find();
    if let Some(quiz_ids) = filter.quiz_ids {
        select = select.filter(Column::QuizId.is_in(quiz_ids));
    }
    if let Some(student_ids) = filter.student_ids {
        select = select.filter(Column::StudentId.is_in(student_ids));
    }
    if let Some(quiz_id) = filter.quiz_id {
        select = select.filter(Column::QuizId.eq(quiz_id));
    }
    if let Some(institution_id) = filter.institution_id {
        select = select.filter(Column::InstitutionId.eq(institution_id));
    }
    if filter.only_completed {
        select = select.filter(Column::Status.eq(AttemptStatus::Completed.as_str()));
    }
    select.order_by_desc(Column::StartedAt)
}

#[async_trait]
impl QuizStorage for SeaOrmStorage {
    async fn create_question(
        &self,
        created_by: &str,
        req: CreateQuestionRequest,
    ) -> Result<QuizQuestion> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let question = quiz_questions::ActiveModel {
            id: Set(new_id()),
            track_id: Set(req.track_id),
            stream_id: Set(req.stream_id),
            subject_id: Set(req.subject_id),
            module_id: Set(req.module_id),
            unit_id: Set(req.unit_id),
            lesson_id: Set(req.lesson_id),
            micro_lesson_id: Set(req.micro_lesson_id),
            question_type: Set(req.question_type.to_string()),
            text: Set(req.text.trim().to_string()),
            image_url: Set(req.image_url),
            marks: Set(req.marks),
            status: Set(req.status.to_string()),
            created_by: Set(created_by.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建题目失败", "Question already exists"))?;

        insert_options(&txn, &question.id, req.options).await?;
        let result = with_options(&txn, vec![question]).await?.pop();
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        result.ok_or_else(|| TutoriaError::internal_server("Question vanished"))
    }

    async fn get_question(&self, id: &str) -> Result<Option<QuizQuestion>> {
        let Some(model) = quiz_questions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询题目失败"))?
        else {
            return Ok(None);
        };

        Ok(with_options(&self.db, vec![model]).await?.pop())
    }

    async fn get_questions_by_ids(&self, ids: &[String]) -> Result<Vec<QuizQuestion>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = quiz_questions::Entity::find()
            .filter(quiz_questions::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_error("批量查询题目失败"))?;

        with_options(&self.db, models).await
    }

    async fn list_questions(
        &self,
        params: QuestionListParams,
    ) -> Result<PaginatedResponse<QuizQuestion>> {
        use quiz_questions::Column;

        let mut select = quiz_questions::Entity::find();
        for (column, value) in [
            (Column::TrackId, &params.track_id),
            (Column::StreamId, &params.stream_id),
            (Column::SubjectId, &params.subject_id),
            (Column::ModuleId, &params.module_id),
            (Column::UnitId, &params.unit_id),
            (Column::LessonId, &params.lesson_id),
            (Column::MicroLessonId, &params.micro_lesson_id),
        ] {
            if let Some(value) = value {
                select = select.filter(column.eq(value.as_str()));
            }
        }
        if let Some(kind) = params.question_type {
            select = select.filter(Column::QuestionType.eq(kind.as_str()));
        }
        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Text.contains(escape_like_pattern(search.trim())));
        }

        let (page, size) = params.pagination.normalized();
        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询题目总数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询题目列表失败"))?;

        Ok(PaginatedResponse::new(
            with_options(&self.db, models).await?,
            PaginationInfo::new(page, size, total),
        ))
    }

    async fn update_question(
        &self,
        id: &str,
        update: UpdateQuestionRequest,
    ) -> Result<Option<QuizQuestion>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = quiz_questions::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询题目失败"))?
        else {
            return Ok(None);
        };

        let mut model: quiz_questions::ActiveModel = existing.into();
        if let Some(text) = update.text {
            model.text = Set(text.trim().to_string());
        }
        if let Some(image_url) = update.image_url {
            model.image_url = Set(Some(image_url));
        }
        if let Some(marks) = update.marks {
            model.marks = Set(marks);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        model.updated_at = Set(now_ts());
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新题目失败"))?;

        if let Some(options) = update.options {
            quiz_options::Entity::delete_many()
                .filter(quiz_options::Column::QuestionId.eq(id))
                .exec(&txn)
                .await
                .map_err(db_error("清除题目选项失败"))?;
            insert_options(&txn, id, options).await?;
        }

        let result = with_options(&txn, vec![updated]).await?.pop();
        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(result)
    }

    async fn delete_question(&self, id: &str) -> Result<bool> {
        let result = quiz_questions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除题目失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz> {
        let req = quiz.request;
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let model = quizzes::ActiveModel {
            id: Set(new_id()),
            institution_id: Set(req.institution_id),
            track_id: Set(req.track_id),
            section_id: Set(req.section_id),
            stream_id: Set(req.stream_id),
            subject_id: Set(req.subject_id),
            module_id: Set(req.module_id),
            unit_id: Set(req.unit_id),
            lesson_id: Set(req.lesson_id),
            micro_lesson_id: Set(req.micro_lesson_id),
            title: Set(req.title.trim().to_string()),
            start_time: Set(req.start_time.map(|t| t.timestamp())),
            end_time: Set(req.end_time.map(|t| t.timestamp())),
            timer_per_question: Set(req.timer_per_question),
            enable_negative_marking: Set(req.enable_negative_marking),
            negative_marks: Set(req.negative_marks.filter(|_| req.enable_negative_marking)),
            status: Set(req.status.to_string()),
            is_free: Set(req.is_free),
            is_active: Set(req.is_active),
            sort_order: Set(req.order),
            created_by: Set(quiz.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(write_error("创建测验失败", "Quiz already exists"))?;

        insert_items(&txn, &model.id, &req.question_ids).await?;
        let result = with_items(&txn, vec![model]).await?.pop();
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        result.ok_or_else(|| TutoriaError::internal_server("Quiz vanished"))
    }

    async fn get_quiz(&self, id: &str) -> Result<Option<Quiz>> {
        let Some(model) = quizzes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询测验失败"))?
        else {
            return Ok(None);
        };

        Ok(with_items(&self.db, vec![model]).await?.pop())
    }

    async fn get_quizzes_by_ids(&self, ids: &[String]) -> Result<Vec<Quiz>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = quizzes::Entity::find()
            .filter(quizzes::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_error("批量查询测验失败"))?;

        with_items(&self.db, models).await
    }

    async fn list_quizzes_by_creator(
        &self,
        created_by: &str,
        params: QuizListParams,
    ) -> Result<PaginatedResponse<Quiz>> {
        let select = quiz_list_select(&params).filter(quizzes::Column::CreatedBy.eq(created_by));
        page_quizzes(self, select, &params.pagination).await
    }

    async fn list_available_quizzes(
        &self,
        track_ids: &[String],
        params: QuizListParams,
    ) -> Result<PaginatedResponse<Quiz>> {
        let select = quiz_list_select(&params).filter(
            Condition::all()
                .add(quizzes::Column::TrackId.is_in(track_ids.iter().cloned()))
                .add(quizzes::Column::IsActive.eq(true))
                .add(quizzes::Column::Status.eq(PublishStatus::Published.as_str())),
        );
        page_quizzes(self, select, &params.pagination).await
    }

    async fn list_quiz_ids_by_creator(&self, created_by: &str) -> Result<Vec<String>> {
        let ids: Vec<String> = quizzes::Entity::find()
            .select_only()
            .column(quizzes::Column::Id)
            .filter(quizzes::Column::CreatedBy.eq(created_by))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error("查询测验失败"))?;

        Ok(ids)
    }

    async fn update_quiz(&self, id: &str, update: UpdateQuizRequest) -> Result<Option<Quiz>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = quizzes::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询测验失败"))?
        else {
            return Ok(None);
        };

        let mut model: quizzes::ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(start) = update.start_time {
            model.start_time = Set(Some(start.timestamp()));
        }
        if let Some(end) = update.end_time {
            model.end_time = Set(Some(end.timestamp()));
        }
        if let Some(timer) = update.timer_per_question {
            model.timer_per_question = Set(Some(timer));
        }
        if let Some(marks) = update.negative_marks {
            model.negative_marks = Set(Some(marks));
        }
        if let Some(enabled) = update.enable_negative_marking {
            model.enable_negative_marking = Set(enabled);
            if !enabled {
                model.negative_marks = Set(None);
            }
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(is_free) = update.is_free {
            model.is_free = Set(is_free);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(order) = update.order {
            model.sort_order = Set(order);
        }
        model.updated_at = Set(now_ts());
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新测验失败"))?;

        if let Some(ref question_ids) = update.question_ids {
            quiz_items::Entity::delete_many()
                .filter(quiz_items::Column::QuizId.eq(id))
                .exec(&txn)
                .await
                .map_err(db_error("清除测验题目失败"))?;
            insert_items(&txn, id, question_ids).await?;
        }

        let result = with_items(&txn, vec![updated]).await?.pop();
        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(result)
    }

    async fn delete_quiz(&self, id: &str) -> Result<bool> {
        let result = quizzes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除测验失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_started_attempt(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> Result<Option<QuizAttempt>> {
        let result = quiz_attempts::Entity::find()
            .filter(quiz_attempts::Column::QuizId.eq(quiz_id))
            .filter(quiz_attempts::Column::StudentId.eq(student_id))
            .filter(quiz_attempts::Column::Status.eq(AttemptStatus::Started.as_str()))
            .order_by_desc(quiz_attempts::Column::StartedAt)
            .one(&self.db)
            .await
            .map_err(db_error("查询作答记录失败"))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    async fn create_attempt(
        &self,
        quiz_id: &str,
        student_id: &str,
        institution_id: &str,
    ) -> Result<QuizAttempt> {
        let result = quiz_attempts::ActiveModel {
            id: Set(new_id()),
            quiz_id: Set(quiz_id.to_string()),
            student_id: Set(student_id.to_string()),
            institution_id: Set(institution_id.to_string()),
            status: Set(AttemptStatus::Started.to_string()),
            score: Set(0.0),
            started_at: Set(now_ts()),
            completed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(write_error("创建作答记录失败", "Attempt already exists"))?;

        Ok(result.into_attempt())
    }

    async fn get_attempt(&self, id: &str) -> Result<Option<QuizAttempt>> {
        let result = quiz_attempts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询作答记录失败"))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    async fn list_attempts(
        &self,
        filter: AttemptFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<QuizAttempt>> {
        fetch_page(&self.db, attempt_select(filter), &pagination, |m| {
            m.into_attempt()
        })
        .await
    }

    async fn list_all_attempts(&self, filter: AttemptFilter) -> Result<Vec<QuizAttempt>> {
        let result = attempt_select(filter)
            .all(&self.db)
            .await
            .map_err(db_error("查询作答记录失败"))?;

        Ok(result.into_iter().map(|m| m.into_attempt()).collect())
    }

    async fn submit_attempt(
        &self,
        attempt_id: &str,
        responses: Vec<ResponseDraft>,
        score: f64,
    ) -> Result<QuizAttempt> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        // 仅 started 状态可被完成，并发提交只有一个能更新成功
        let claimed = quiz_attempts::Entity::update_many()
            .col_expr(
                quiz_attempts::Column::Status,
                Expr::value(AttemptStatus::Completed.to_string()),
            )
            .col_expr(quiz_attempts::Column::Score, Expr::value(score))
            .col_expr(quiz_attempts::Column::CompletedAt, Expr::value(Some(now)))
            .filter(quiz_attempts::Column::Id.eq(attempt_id))
            .filter(quiz_attempts::Column::Status.eq(AttemptStatus::Started.as_str()))
            .exec(&txn)
            .await
            .map_err(db_error("更新作答记录失败"))?;
        if claimed.rows_affected == 0 {
            let exists = quiz_attempts::Entity::find_by_id(attempt_id)
                .one(&txn)
                .await
                .map_err(db_error("查询作答记录失败"))?
                .is_some();
            return Err(if exists {
                TutoriaError::validation("Attempt has already been submitted")
            } else {
                TutoriaError::not_found("Attempt not found")
            });
        }

        // 覆盖此前保存的作答
        quiz_responses::Entity::delete_many()
            .filter(quiz_responses::Column::AttemptId.eq(attempt_id))
            .exec(&txn)
            .await
            .map_err(db_error("清除作答失败"))?;

        if !responses.is_empty() {
            let rows: Vec<_> = responses
                .into_iter()
                .map(|r| quiz_responses::ActiveModel {
                    id: Set(new_id()),
                    attempt_id: Set(attempt_id.to_string()),
                    question_id: Set(r.question_id),
                    selected_option: Set(r.selected_option.map(|o| o.to_string())),
                    short_answer: Set(r.short_answer),
                    is_correct: Set(r.is_correct),
                    manual_score: Set(None),
                    created_at: Set(now),
                })
                .collect();
            quiz_responses::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(write_error("写入作答失败", "Duplicate answer for a question"))?;
        }

        let updated = quiz_attempts::Entity::find_by_id(attempt_id)
            .one(&txn)
            .await
            .map_err(db_error("查询作答记录失败"))?
            .ok_or_else(|| TutoriaError::not_found("Attempt not found"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(updated.into_attempt())
    }

    async fn list_attempt_responses(&self, attempt_id: &str) -> Result<Vec<QuizResponse>> {
        let result = quiz_responses::Entity::find()
            .filter(quiz_responses::Column::AttemptId.eq(attempt_id))
            .order_by_asc(quiz_responses::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error("查询作答失败"))?;

        Ok(result.into_iter().map(|m| m.into_response()).collect())
    }

    async fn get_response(&self, id: &str) -> Result<Option<QuizResponse>> {
        let result = quiz_responses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询作答失败"))?;

        Ok(result.map(|m| m.into_response()))
    }

    async fn grade_response(
        &self,
        response_id: &str,
        manual_score: f64,
        scorer: AttemptScorer<'_>,
    ) -> Result<QuizResponse> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let response = quiz_responses::Entity::find_by_id(response_id)
            .one(&txn)
            .await
            .map_err(db_error("查询作答失败"))?
            .ok_or_else(|| TutoriaError::not_found("Response not found"))?;
        let attempt_id = response.attempt_id.clone();

        // 锁住作答记录，同一作答的批改串行执行（SQLite 下写事务本身互斥）
        quiz_attempts::Entity::find_by_id(attempt_id.as_str())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_error("锁定作答记录失败"))?
            .ok_or_else(|| TutoriaError::not_found("Attempt not found"))?;

        let mut model: quiz_responses::ActiveModel = response.into();
        model.manual_score = Set(Some(manual_score));
        model.is_correct = Set(Some(manual_score > 0.0));
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新作答评分失败"))?;

        let responses: Vec<QuizResponse> = quiz_responses::Entity::find()
            .filter(quiz_responses::Column::AttemptId.eq(attempt_id.as_str()))
            .all(&txn)
            .await
            .map_err(db_error("查询作答失败"))?
            .into_iter()
            .map(|m| m.into_response())
            .collect();
        let attempt_score = scorer(&responses);

        quiz_attempts::Entity::update_many()
            .col_expr(quiz_attempts::Column::Score, Expr::value(attempt_score))
            .filter(quiz_attempts::Column::Id.eq(attempt_id))
            .exec(&txn)
            .await
            .map_err(db_error("更新作答总分失败"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(updated.into_response())
    }
}
