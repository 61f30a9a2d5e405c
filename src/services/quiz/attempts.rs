use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{QuizService, load_quiz, scoring};
use crate::errors::{Result, TutoriaError};
use crate::models::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, ValidationErrors,
    quiz::{
        entities::{AttemptStatus, Quiz, QuizAttempt, QuizQuestion, QuizResponse},
        requests::{
            AnswerInput, AttemptFilter, AttemptListParams, GradeResponseRequest, ResponseDraft,
            SubmitQuizRequest,
        },
        responses::{AttemptDetailResponse, ParentAttemptResponse, SubmitQuizResponse},
    },
    users::entities::User,
};
use crate::services::{access, current_user};
use crate::storage::Storage;

/// 校验作答并生成待写入的记录，客观题在此判分
pub(crate) fn build_drafts(
    quiz: &Quiz,
    questions: &HashMap<String, QuizQuestion>,
    answers: Vec<AnswerInput>,
) -> std::result::Result<Vec<ResponseDraft>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut seen = HashSet::new();
    let mut drafts = Vec::with_capacity(answers.len());

    for answer in answers {
        if !seen.insert(answer.question_id.clone()) {
            errors.add(
                "answers",
                format!("Question {} answered more than once", answer.question_id),
            );
            continue;
        }
        let question = match questions.get(&answer.question_id) {
            Some(q) if quiz.question_ids.contains(&q.id) => q,
            _ => {
                errors.add(
                    "answers",
                    format!("Question {} is not part of this quiz", answer.question_id),
                );
                continue;
            }
        };

        if question.question_type.is_objective() {
            match answer.selected_option {
                Some(label) if question.question_type.allowed_labels().contains(&label) => {}
                Some(label) => {
                    errors.add(
                        "answers",
                        format!("Option '{label}' is not valid for question {}", question.id),
                    );
                    continue;
                }
                None => {
                    errors.add(
                        "answers",
                        format!("Question {} requires a selected option", question.id),
                    );
                    continue;
                }
            }
            drafts.push(ResponseDraft {
                question_id: question.id.clone(),
                selected_option: answer.selected_option,
                short_answer: None,
                is_correct: scoring::judge(question, answer.selected_option),
            });
        } else {
            let text = answer
                .short_answer
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            let Some(text) = text else {
                errors.add(
                    "answers",
                    format!("Question {} requires a short answer", question.id),
                );
                continue;
            };
            drafts.push(ResponseDraft {
                question_id: question.id.clone(),
                selected_option: None,
                short_answer: Some(text),
                is_correct: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(drafts)
    } else {
        Err(errors)
    }
}

pub async fn start_quiz(
    service: &QuizService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let quiz = match load_quiz(&storage, &id).await? {
        Ok(quiz) => quiz,
        Err(resp) => return Ok(resp),
    };
    access::ensure_institution_member(&storage, &user, &quiz.institution_id).await?;

    if !quiz.is_available() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuizNotAvailable,
            "Quiz is not available",
        )));
    }
    if !quiz.is_open_at(chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuizNotAvailable,
            "Quiz is not open at this time",
        )));
    }
    if !user.is_student {
        warn!("Non-student user {} tried to start quiz {}", user.id, id);
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only students can attempt quizzes",
        )));
    }
    let enrolled = access::student_enrollments(&storage, &user.id, Some(&quiz.institution_id))
        .await?
        .iter()
        .any(|e| e.track_id == quiz.track_id);
    if !enrolled {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You are not enrolled in this curriculum track",
        )));
    }

    if let Some(attempt) = storage.find_started_attempt(&quiz.id, &user.id).await? {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            attempt,
            "Quiz attempt resumed",
        )));
    }

    let attempt = storage
        .create_attempt(&quiz.id, &user.id, &quiz.institution_id)
        .await?;
    info!("Attempt {} started on quiz {} by {}", attempt.id, quiz.id, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        attempt,
        "Quiz attempt started",
    )))
}

pub async fn submit_quiz(
    service: &QuizService,
    id: String,
    req: SubmitQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let quiz = match load_quiz(&storage, &id).await? {
        Ok(quiz) => quiz,
        Err(resp) => return Ok(resp),
    };

    let attempt = match storage.get_attempt(&req.attempt_id).await? {
        Some(a) if a.student_id == user.id && a.quiz_id == quiz.id => a,
        _ => {
            return Ok(
                ValidationErrors::single("attempt_id", "Attempt not found for this quiz")
                    .into_unprocessable_response(),
            );
        }
    };
    if attempt.status == AttemptStatus::Completed {
        return Ok(
            ValidationErrors::single("attempt_id", "Attempt has already been submitted")
                .into_unprocessable_response(),
        );
    }

    let questions: HashMap<String, QuizQuestion> = storage
        .get_questions_by_ids(&quiz.question_ids)
        .await?
        .into_iter()
        .map(|q| (q.id.clone(), q))
        .collect();
    let drafts = match build_drafts(&quiz, &questions, req.answers) {
        Ok(drafts) => drafts,
        Err(errors) => return Ok(errors.into_unprocessable_response()),
    };

    let negative = scoring::negative_marks(&quiz);
    let total: f64 = drafts
        .iter()
        .map(|d| {
            let marks = questions.get(&d.question_id).map_or(0.0, |q| q.marks);
            scoring::response_score(marks, negative, d.is_correct, None)
        })
        .sum();
    let score = total.max(0.0);

    let attempt = match storage.submit_attempt(&attempt.id, drafts, score).await {
        Ok(attempt) => attempt,
        Err(TutoriaError::Validation(msg)) => {
            return Ok(ValidationErrors::single("attempt_id", msg).into_unprocessable_response());
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Attempt {} on quiz {} submitted by {} with score {}",
        attempt.id, quiz.id, user.id, attempt.score
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        SubmitQuizResponse {
            submitted_at: attempt.completed_at.unwrap_or_else(chrono::Utc::now),
            attempt_id: attempt.id,
            final_score: attempt.score,
        },
        "Quiz submitted successfully",
    )))
}

pub async fn grade_response(
    service: &QuizService,
    id: String,
    req: GradeResponseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let quiz = match load_quiz(&storage, &id).await? {
        Ok(quiz) => quiz,
        Err(resp) => return Ok(resp),
    };
    if quiz.created_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the quiz creator can grade responses",
        )));
    }
    if !req.manual_score.is_finite() || req.manual_score < 0.0 {
        return Ok(
            ValidationErrors::single("manual_score", "Score must be zero or greater")
                .into_unprocessable_response(),
        );
    }

    let response = storage.get_response(&req.response_id).await?;
    let attempt = match &response {
        Some(r) => storage.get_attempt(&r.attempt_id).await?,
        None => None,
    };
    let (Some(response), Some(attempt)) = (response, attempt) else {
        return Ok(ValidationErrors::single("response_id", "Response not found")
            .into_unprocessable_response());
    };
    if attempt.quiz_id != quiz.id {
        return Ok(
            ValidationErrors::single("response_id", "Response does not belong to this quiz")
                .into_unprocessable_response(),
        );
    }

    let questions: HashMap<String, QuizQuestion> = storage
        .get_questions_by_ids(&quiz.question_ids)
        .await?
        .into_iter()
        .map(|q| (q.id.clone(), q))
        .collect();
    let Some(question) = questions.get(&response.question_id) else {
        return Ok(ValidationErrors::single("response_id", "Question no longer exists")
            .into_unprocessable_response());
    };
    if question.question_type.is_objective() {
        return Ok(ValidationErrors::single(
            "response_id",
            "Only short answer responses can be graded manually",
        )
        .into_unprocessable_response());
    }
    if req.manual_score > question.marks {
        return Ok(ValidationErrors::single(
            "manual_score",
            format!("Score cannot exceed the question's {} marks", question.marks),
        )
        .into_unprocessable_response());
    }

    let scorer = |responses: &[QuizResponse]| scoring::attempt_score(&quiz, &questions, responses);
    let graded = storage
        .grade_response(&response.id, req.manual_score, &scorer)
        .await?;
    info!(
        "Response {} graded {} by {} on attempt {}",
        graded.id, req.manual_score, user.id, attempt.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        graded,
        "Response graded successfully",
    )))
}

pub async fn list_attempts(
    service: &QuizService,
    params: AttemptListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut filter = AttemptFilter {
        quiz_id: params.quiz_id,
        ..Default::default()
    };
    if user.is_teacher {
        filter.quiz_ids = Some(storage.list_quiz_ids_by_creator(&user.id).await?);
    } else if user.is_student {
        filter.student_ids = Some(vec![user.id.clone()]);
    } else {
        let (page, size) = params.pagination.normalized();
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            PaginatedResponse::<QuizAttempt>::new(
                vec![],
                PaginationInfo::new(page, size, 0),
            ),
            "Quiz attempts retrieved successfully",
        )));
    }

    let attempts = storage.list_attempts(filter, params.pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        attempts,
        "Quiz attempts retrieved successfully",
    )))
}

/// 作答本人或测验创建者，且属于同一机构
pub(crate) async fn ensure_can_view_attempt(
    storage: &Arc<dyn Storage>,
    user: &User,
    attempt: &QuizAttempt,
    quiz: &Quiz,
) -> Result<()> {
    access::ensure_institution_member(storage, user, &attempt.institution_id).await?;
    if attempt.student_id != user.id && quiz.created_by != user.id {
        return Err(TutoriaError::authorization(
            "You do not have permission to view this attempt",
        ));
    }
    Ok(())
}

pub async fn get_attempt(
    service: &QuizService,
    id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(attempt) = storage.get_attempt(&id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Attempt not found",
        )));
    };
    let quiz = match load_quiz(&storage, &attempt.quiz_id).await? {
        Ok(quiz) => quiz,
        Err(resp) => return Ok(resp),
    };
    ensure_can_view_attempt(&storage, &user, &attempt, &quiz).await?;

    let responses = storage.list_attempt_responses(&attempt.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttemptDetailResponse {
            attempt,
            quiz_title: quiz.title,
            responses,
        },
        "Quiz attempt retrieved successfully",
    )))
}

pub async fn parent_attempts(
    service: &QuizService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if !user.is_parents {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only parents can access this endpoint",
        )));
    }

    let children: HashMap<String, String> = storage
        .list_children(&user.id)
        .await?
        .into_iter()
        .map(|c| (c.child_id, c.child_name))
        .collect();
    if children.is_empty() {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            Vec::<ParentAttemptResponse>::new(),
            "Quiz attempts retrieved successfully",
        )));
    }

    let attempts = storage
        .list_all_attempts(AttemptFilter {
            student_ids: Some(children.keys().cloned().collect()),
            ..Default::default()
        })
        .await?;
    let quiz_ids: Vec<String> = attempts
        .iter()
        .map(|a| a.quiz_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let titles: HashMap<String, String> = storage
        .get_quizzes_by_ids(&quiz_ids)
        .await?
        .into_iter()
        .map(|q| (q.id, q.title))
        .collect();

    let items: Vec<ParentAttemptResponse> = attempts
        .into_iter()
        .map(|attempt| ParentAttemptResponse {
            quiz_title: titles.get(&attempt.quiz_id).cloned().unwrap_or_default(),
            child_name: children.get(&attempt.student_id).cloned().unwrap_or_default(),
            child_id: attempt.student_id.clone(),
            attempt,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Quiz attempts retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::entities::{OptionLabel, PublishStatus, QuestionType, QuizOption};

    fn question(id: &str, question_type: QuestionType) -> QuizQuestion {
        let options = if question_type == QuestionType::TrueFalse {
            vec![
                QuizOption {
                    id: format!("{id}-t"),
                    label: OptionLabel::T,
                    text: "True".to_string(),
                    is_correct: Some(true),
                },
                QuizOption {
                    id: format!("{id}-f"),
                    label: OptionLabel::F,
                    text: "False".to_string(),
                    is_correct: Some(false),
                },
            ]
        } else {
            vec![]
        };
        QuizQuestion {
            id: id.to_string(),
            track_id: "t".to_string(),
            stream_id: "st".to_string(),
            subject_id: "s".to_string(),
            module_id: "m".to_string(),
            unit_id: "u".to_string(),
            lesson_id: None,
            micro_lesson_id: None,
            question_type,
            text: "?".to_string(),
            image_url: None,
            marks: 1.0,
            status: PublishStatus::Published,
            created_by: "teacher".to_string(),
            options,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn setup() -> (Quiz, HashMap<String, QuizQuestion>) {
        let quiz: Quiz = serde_json::from_value(serde_json::json!({
            "id": "quiz",
            "institution_id": "i",
            "track_id": "t",
            "section_id": null,
            "stream_id": null,
            "subject_id": "s",
            "module_id": null,
            "unit_id": null,
            "lesson_id": null,
            "micro_lesson_id": null,
            "title": "Weekly",
            "start_time": null,
            "end_time": null,
            "timer_per_question": null,
            "enable_negative_marking": false,
            "negative_marks": null,
            "status": "published",
            "is_free": false,
            "is_active": true,
            "order": 0,
            "created_by": "teacher",
            "question_ids": ["tf", "short"],
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        let questions = [
            question("tf", QuestionType::TrueFalse),
            question("short", QuestionType::Short),
            question("other", QuestionType::Short),
        ]
        .into_iter()
        .map(|q| (q.id.clone(), q))
        .collect();
        (quiz, questions)
    }

    fn answer(id: &str, option: Option<OptionLabel>, text: Option<&str>) -> AnswerInput {
        AnswerInput {
            question_id: id.to_string(),
            selected_option: option,
            short_answer: text.map(str::to_string),
        }
    }

    #[test]
    fn test_drafts_judge_objective_answers() {
        let (quiz, questions) = setup();
        let drafts = build_drafts(
            &quiz,
            &questions,
            vec![
                answer("tf", Some(OptionLabel::F), None),
                answer("short", None, Some("  photosynthesis ")),
            ],
        )
        .unwrap();
        assert_eq!(drafts[0].is_correct, Some(false));
        assert_eq!(drafts[1].is_correct, None);
        assert_eq!(drafts[1].short_answer.as_deref(), Some("photosynthesis"));
    }

    #[test]
    fn test_drafts_reject_invalid_answers() {
        let (quiz, questions) = setup();
        for answers in [
            vec![answer("tf", Some(OptionLabel::A), None)],
            vec![answer("tf", None, None)],
            vec![answer("short", None, Some("   "))],
            vec![answer("other", None, Some("x"))],
            vec![
                answer("tf", Some(OptionLabel::T), None),
                answer("tf", Some(OptionLabel::T), None),
            ],
        ] {
            let errors = build_drafts(&quiz, &questions, answers).unwrap_err();
            assert!(errors.has("answers"));
        }
    }
}
