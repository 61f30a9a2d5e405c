use std::collections::HashMap;
use std::sync::Arc;

use super::SeaOrmStorage;
use crate::errors::TutoriaError;
use crate::models::{
    PaginationQuery,
    attendance::{
        entities::AttendanceStatus,
        requests::{AttendanceFilter, NewAttendance},
    },
    curriculum::{
        entities::{CurriculumLevel, Section},
        requests::{CreateGlobalItemRequest, CreateSectionRequest, NewNode, NodeFilter},
    },
    enrollments::requests::{CreateStudentEnrollmentRequest, CreateTeacherEnrollmentRequest, EnrollmentFilter},
    institutions::{entities::{Institution, InstitutionType}, requests::CreateInstitutionRequest},
    memberships::{
        entities::{AdmissionStatus, MembershipRole},
        requests::NewInvitation,
    },
    notices::{
        entities::{NoticeType, TargetAudience},
        requests::{CreateNoticeRequest, NoticeFilter},
    },
    payments::{entities::PaymentStatus, requests::NewFeePayment},
    quiz::{
        entities::{AttemptStatus, OptionLabel, PublishStatus, QuestionType, Quiz, QuizQuestion},
        requests::{CreateQuestionRequest, CreateQuizRequest, NewQuiz, OptionInput, ResponseDraft},
    },
    users::{entities::User, requests::NewUser},
};
use crate::services::{access, attendance::mark::validate_marking, quiz::attempts, quiz::scoring};
use crate::storage::{
    AttendanceStorage, CurriculumStorage, EnrollmentStorage, InstitutionStorage,
    MembershipStorage, NoticeStorage, PaymentStorage, QuizStorage, Storage, UserStorage,
};
use crate::utils::now_ts;

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::new_in_memory()
        .await
        .expect("in-memory storage")
}

async fn user(storage: &SeaOrmStorage, email: &str) -> User {
    storage
        .create_user(NewUser {
            email: Some(email.to_string()),
            password_hash: "hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            is_active: true,
            ..Default::default()
        })
        .await
        .expect("create user")
}

async fn institution(storage: &SeaOrmStorage, admin: &User, code: &str) -> Institution {
    storage
        .create_institution(
            &admin.id,
            CreateInstitutionRequest {
                name: "Dhaka Model School".to_string(),
                description: None,
                short_code: Some(code.to_string()),
                address: None,
                institution_type: InstitutionType::HighSchool,
            },
        )
        .await
        .expect("create institution")
}

/// track 节点、subject 节点与一个分组
async fn track_with_section(
    storage: &SeaOrmStorage,
    institution: &Institution,
) -> (String, String, Section) {
    let mut ids = Vec::new();
    let mut parent: Option<String> = None;
    let mut track_id: Option<String> = None;
    for level in [
        CurriculumLevel::Track,
        CurriculumLevel::Stream,
        CurriculumLevel::Subject,
    ] {
        let item = storage
            .create_global_item(
                level,
                CreateGlobalItemRequest {
                    name: format!("{level} item"),
                    code: None,
                    description: None,
                    content: None,
                    content_type: None,
                    video_url: None,
                    image_url: None,
                    institution_type: InstitutionType::HighSchool,
                    is_active: true,
                },
            )
            .await
            .expect("create global item");
        let node = storage
            .create_node(NewNode {
                institution_id: institution.id.clone(),
                level,
                parent_id: parent.clone(),
                track_id: track_id.clone(),
                section_id: None,
                global_item_id: item.id,
                name: format!("{level} node"),
                order: 0,
            })
            .await
            .expect("create node");
        if level == CurriculumLevel::Track {
            track_id = Some(node.id.clone());
        }
        parent = Some(node.id.clone());
        ids.push(node.id);
    }

    let track = ids[0].clone();
    let subject = ids[2].clone();
    let section = storage
        .create_section(CreateSectionRequest {
            institution_id: institution.id.clone(),
            track_id: track.clone(),
            name: "Section A".to_string(),
            order: 0,
        })
        .await
        .expect("create section");
    (track, subject, section)
}

#[tokio::test]
async fn test_user_lookup_by_email_is_case_insensitive() {
    let storage = storage().await;
    let created = user(&storage, "teacher@school.com").await;

    let found = storage
        .get_user_by_email("Teacher@School.com")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(found.id, created.id);

    let duplicate = storage
        .create_user(NewUser {
            email: Some("teacher@school.com".to_string()),
            password_hash: "hash".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(duplicate, Err(TutoriaError::Conflict(_))));
}

#[tokio::test]
async fn test_create_institution_adds_admin_membership() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;

    let membership = storage
        .get_membership(&inst.id, &admin.id, MembershipRole::Admin)
        .await
        .unwrap();
    assert!(membership.is_some());

    let mine = storage.list_my_memberships(&admin.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].institution_name, "Dhaka Model School");

    let other = user(&storage, "other@school.com").await;
    let clash = storage
        .create_institution(
            &other.id,
            CreateInstitutionRequest {
                name: "Another".to_string(),
                description: None,
                short_code: Some("DMS".to_string()),
                address: None,
                institution_type: InstitutionType::Coaching,
            },
        )
        .await;
    assert!(matches!(clash, Err(TutoriaError::Conflict(_))));
}

#[tokio::test]
async fn test_approve_admission_creates_student_membership() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let seeker = user(&storage, "seeker@school.com").await;

    let request = storage
        .create_admission_request(&seeker.id, &inst.id, Some("please".to_string()))
        .await
        .unwrap();
    assert!(
        storage
            .find_pending_admission_request(&seeker.id, &inst.id)
            .await
            .unwrap()
            .is_some()
    );

    let approved = storage
        .approve_admission_request(&request.id, &admin.id)
        .await
        .unwrap();
    assert_eq!(approved.status, AdmissionStatus::Approved);
    assert_eq!(approved.processed_by.as_deref(), Some(admin.id.as_str()));

    let student = storage.get_user_by_id(&seeker.id).await.unwrap().unwrap();
    assert!(student.is_student);
    assert!(!student.is_admission_seeker);
    assert!(
        storage
            .get_membership(&inst.id, &seeker.id, MembershipRole::Student)
            .await
            .unwrap()
            .is_some()
    );

    // 已处理的申请不能再次批准
    let again = storage.approve_admission_request(&request.id, &admin.id).await;
    assert!(matches!(again, Err(TutoriaError::Validation(_))));
}

#[tokio::test]
async fn test_parent_child_link_sets_parent_flag() {
    let storage = storage().await;
    let parent = user(&storage, "parent@home.com").await;
    let child = user(&storage, "child@home.com").await;

    storage
        .create_parent_child(&parent.id, &child.id)
        .await
        .unwrap();
    let parent = storage.get_user_by_id(&parent.id).await.unwrap().unwrap();
    assert!(parent.is_parents);

    let children = storage.list_children(&parent.id).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].child_name, "Test User");

    let duplicate = storage.create_parent_child(&parent.id, &child.id).await;
    assert!(matches!(duplicate, Err(TutoriaError::Conflict(_))));
}

#[tokio::test]
async fn test_teacher_enrollment_links_filter_by_section() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (track, subject, section) = track_with_section(&storage, &inst).await;
    let teacher = user(&storage, "teacher@school.com").await;

    let enrollment = storage
        .create_teacher_enrollment(CreateTeacherEnrollmentRequest {
            institution_id: inst.id.clone(),
            user_id: teacher.id.clone(),
            track_ids: vec![track.clone()],
            section_ids: vec![section.id.clone(), section.id.clone()],
            subject_ids: vec![subject.clone()],
        })
        .await
        .unwrap();
    assert_eq!(enrollment.section_ids, vec![section.id.clone()]);
    assert!(enrollment.covers(&section.id, &subject));

    let by_section = storage
        .list_teacher_enrollments(
            EnrollmentFilter {
                section_id: Some(section.id.clone()),
                ..Default::default()
            },
            PaginationQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_section.items.len(), 1);

    let by_other = storage
        .list_teacher_enrollments(
            EnrollmentFilter {
                section_id: Some("missing".to_string()),
                ..Default::default()
            },
            PaginationQuery::default(),
        )
        .await
        .unwrap();
    assert!(by_other.items.is_empty());
}

#[tokio::test]
async fn test_bulk_attendance_is_atomic() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (_, subject, section) = track_with_section(&storage, &inst).await;
    let first = user(&storage, "s1@school.com").await;
    let second = user(&storage, "s2@school.com").await;

    let row = |student: &User, status| NewAttendance {
        institution_id: inst.id.clone(),
        student_id: student.id.clone(),
        section_id: section.id.clone(),
        subject_id: subject.clone(),
        date: "2025-03-01".to_string(),
        status,
        created_by: admin.id.clone(),
    };

    storage
        .create_attendance(row(&first, AttendanceStatus::Present))
        .await
        .unwrap();

    // 第二行与已有记录冲突，整批回滚
    let result = storage
        .bulk_create_attendance(vec![
            row(&second, AttendanceStatus::Late),
            row(&first, AttendanceStatus::Absent),
        ])
        .await;
    assert!(matches!(result, Err(TutoriaError::Conflict(_))));

    let all = storage
        .list_all_attendance(AttendanceFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);

    let marked = storage
        .find_marked_students(
            &section.id,
            &subject,
            "2025-03-01",
            &[first.id.clone(), second.id.clone()],
        )
        .await
        .unwrap();
    assert_eq!(marked, vec![first.id.clone()]);

    // 空的可见范围不返回任何记录
    let none = storage
        .list_all_attendance(AttendanceFilter {
            student_ids: Some(Vec::new()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_nodes_listed_by_level_and_parent() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (track, subject, _) = track_with_section(&storage, &inst).await;

    let tracks = storage
        .list_all_nodes(Some(CurriculumLevel::Track), NodeFilter::default())
        .await
        .unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].track_id, track);

    let subject_node = storage.get_node(&subject).await.unwrap().unwrap();
    assert_eq!(subject_node.track_id, track);
    assert_eq!(subject_node.level, CurriculumLevel::Subject);
}

#[tokio::test]
async fn test_notice_visibility_by_audience() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;

    for audience in [TargetAudience::Teachers, TargetAudience::Students, TargetAudience::All] {
        storage
            .create_notice(
                &admin.id,
                CreateNoticeRequest {
                    institution_id: inst.id.clone(),
                    title: format!("For {audience}"),
                    content: "content".to_string(),
                    target_audience: audience,
                    notice_type: NoticeType::General,
                },
            )
            .await
            .unwrap();
    }

    let student_view = storage
        .list_notices(
            NoticeFilter {
                scopes: vec![(
                    inst.id.clone(),
                    TargetAudience::visible_to(MembershipRole::Student).to_vec(),
                )],
                ..Default::default()
            },
            PaginationQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(student_view.items.len(), 2);

    let outsider = storage
        .list_notices(NoticeFilter::default(), PaginationQuery::default())
        .await
        .unwrap();
    assert!(outsider.items.is_empty());
}

#[tokio::test]
async fn test_fee_payment_lifecycle() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (track, _, section) = track_with_section(&storage, &inst).await;
    let student = user(&storage, "student@school.com").await;
    let enrollment = storage
        .create_student_enrollment(CreateStudentEnrollmentRequest {
            institution_id: inst.id.clone(),
            user_id: student.id.clone(),
            track_id: track,
            section_id: section.id,
        })
        .await
        .unwrap();

    let payment = storage
        .create_fee_payment(NewFeePayment {
            payment_id: "TR0011abc".to_string(),
            invoice_number: format!("FEE-{}-202503", enrollment.id),
            enrollment_id: enrollment.id.clone(),
            institution_id: inst.id.clone(),
            month: "2025-03-01".to_string(),
            amount_minor: 75_000,
            scholarship_minor: 25_000,
            paid_by: student.id.clone(),
        })
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.scholarship_applied);
    assert_eq!(payment.amount.to_string(), "750.00");

    let open = storage
        .find_open_fee_payment(&enrollment.id, "2025-03-01")
        .await
        .unwrap();
    assert!(open.is_some());

    let finished = storage
        .finish_payment("TR0011abc", PaymentStatus::Completed, Some("TRX9".to_string()))
        .await
        .unwrap()
        .expect("payment exists");
    assert_eq!(finished.status, PaymentStatus::Completed);
    assert_eq!(finished.trx_id.as_deref(), Some("TRX9"));

    let fee_payment = storage.get_fee_payment(&payment.id).await.unwrap().unwrap();
    assert_eq!(fee_payment.status, PaymentStatus::Completed);

    let trackers = storage
        .list_trackers(&[inst.id.clone()], Some(false), PaginationQuery::default())
        .await
        .unwrap();
    assert_eq!(trackers.items.len(), 1);
    let disbursed = storage
        .disburse_tracker(&trackers.items[0].id)
        .await
        .unwrap()
        .unwrap();
    assert!(disbursed.is_disbursed);
    assert!(disbursed.disbursed_at.is_some());
}

/// 通过邀请加入机构成为教师
async fn join_as_teacher(storage: &SeaOrmStorage, inst: &Institution, teacher: &User) {
    let invitation = storage
        .create_invitation(NewInvitation {
            institution_id: inst.id.clone(),
            email: teacher.email.clone(),
            phone_number: None,
            role: MembershipRole::Teacher,
            invited_by: inst.admin_id.clone(),
            expires_at: now_ts() + 3600,
        })
        .await
        .unwrap();
    storage
        .accept_invitation(&invitation.id, &teacher.id)
        .await
        .unwrap();
}

/// 通过入学申请成为学生
async fn admit_student(storage: &SeaOrmStorage, inst: &Institution, student: &User) {
    let request = storage
        .create_admission_request(&student.id, &inst.id, None)
        .await
        .unwrap();
    storage
        .approve_admission_request(&request.id, &inst.admin_id)
        .await
        .unwrap();
}

fn option(label: OptionLabel, is_correct: bool) -> OptionInput {
    OptionInput {
        label,
        text: format!("option {label}"),
        is_correct,
    }
}

async fn question(
    storage: &SeaOrmStorage,
    creator: &User,
    question_type: QuestionType,
    marks: f64,
    options: Vec<OptionInput>,
) -> QuizQuestion {
    storage
        .create_question(
            &creator.id,
            CreateQuestionRequest {
                track_id: "g-track".to_string(),
                stream_id: "g-stream".to_string(),
                subject_id: "g-subject".to_string(),
                module_id: "g-module".to_string(),
                unit_id: "g-unit".to_string(),
                lesson_id: None,
                micro_lesson_id: None,
                question_type,
                text: format!("{question_type} question"),
                image_url: None,
                marks,
                status: PublishStatus::Published,
                options,
            },
        )
        .await
        .unwrap()
}

/// 一道 2 分选择题和一道 5 分简答题组成的测验
async fn quiz_with_questions(
    storage: &SeaOrmStorage,
    inst: &Institution,
    creator: &User,
    track_id: &str,
    subject_id: &str,
) -> (Quiz, HashMap<String, QuizQuestion>) {
    let mcq = question(
        storage,
        creator,
        QuestionType::Mcq,
        2.0,
        vec![option(OptionLabel::A, true), option(OptionLabel::B, false)],
    )
    .await;
    let short = question(storage, creator, QuestionType::Short, 5.0, vec![]).await;

    let quiz = storage
        .create_quiz(NewQuiz {
            request: CreateQuizRequest {
                institution_id: inst.id.clone(),
                track_id: track_id.to_string(),
                section_id: None,
                stream_id: None,
                subject_id: subject_id.to_string(),
                module_id: None,
                unit_id: None,
                lesson_id: None,
                micro_lesson_id: None,
                title: "Weekly quiz".to_string(),
                start_time: None,
                end_time: None,
                timer_per_question: None,
                enable_negative_marking: false,
                negative_marks: None,
                status: PublishStatus::Published,
                is_free: false,
                is_active: true,
                order: 0,
                question_ids: vec![mcq.id.clone(), short.id.clone()],
            },
            created_by: creator.id.clone(),
        })
        .await
        .unwrap();

    let questions = [mcq, short]
        .into_iter()
        .map(|q| (q.id.clone(), q))
        .collect();
    (quiz, questions)
}

fn drafts(questions: &HashMap<String, QuizQuestion>) -> Vec<ResponseDraft> {
    questions
        .values()
        .map(|q| match q.question_type {
            QuestionType::Short => ResponseDraft {
                question_id: q.id.clone(),
                selected_option: None,
                short_answer: Some("Photosynthesis".to_string()),
                is_correct: None,
            },
            _ => ResponseDraft {
                question_id: q.id.clone(),
                selected_option: Some(OptionLabel::A),
                short_answer: None,
                is_correct: Some(true),
            },
        })
        .collect()
}

#[tokio::test]
async fn test_attendance_rejects_subject_of_another_track() {
    let storage = Arc::new(storage().await);
    let shared: Arc<dyn Storage> = storage.clone();
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (track_a, subject_a, section_a) = track_with_section(&storage, &inst).await;
    let (_, _, section_b) = track_with_section(&storage, &inst).await;
    let student = user(&storage, "student@school.com").await;
    storage
        .create_student_enrollment(CreateStudentEnrollmentRequest {
            institution_id: inst.id.clone(),
            user_id: student.id.clone(),
            track_id: track_a,
            section_id: section_a.id.clone(),
        })
        .await
        .unwrap();
    let students = [student.id.clone()];

    let crossed = validate_marking(
        &shared,
        &inst.id,
        &section_b.id,
        &subject_a,
        "2025-03-01",
        &students,
    )
    .await;
    assert!(matches!(crossed, Err(TutoriaError::Validation(_))));

    let date = validate_marking(
        &shared,
        &inst.id,
        &section_a.id,
        &subject_a,
        "2025-03-01",
        &students,
    )
    .await
    .unwrap();
    assert_eq!(date, "2025-03-01");
}

#[tokio::test]
async fn test_teacher_must_be_enrolled_in_subject_to_mark_attendance() {
    let storage = Arc::new(storage().await);
    let shared: Arc<dyn Storage> = storage.clone();
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (track, subject, section) = track_with_section(&storage, &inst).await;
    let (_, other_subject, _) = track_with_section(&storage, &inst).await;
    let teacher = user(&storage, "teacher@school.com").await;

    // 尚未加入机构
    let outsider = access::ensure_teaches(&shared, &teacher, &inst.id, &section.id, &subject).await;
    assert!(matches!(outsider, Err(TutoriaError::Authorization(_))));

    join_as_teacher(&storage, &inst, &teacher).await;
    let unassigned = access::ensure_teaches(&shared, &teacher, &inst.id, &section.id, &subject).await;
    assert!(matches!(unassigned, Err(TutoriaError::Authorization(_))));

    storage
        .create_teacher_enrollment(CreateTeacherEnrollmentRequest {
            institution_id: inst.id.clone(),
            user_id: teacher.id.clone(),
            track_ids: vec![track],
            section_ids: vec![section.id.clone()],
            subject_ids: vec![subject.clone()],
        })
        .await
        .unwrap();
    access::ensure_teaches(&shared, &teacher, &inst.id, &section.id, &subject)
        .await
        .unwrap();

    let other =
        access::ensure_teaches(&shared, &teacher, &inst.id, &section.id, &other_subject).await;
    assert!(matches!(other, Err(TutoriaError::Authorization(_))));
}

#[tokio::test]
async fn test_student_cannot_view_another_students_attempt() {
    let storage = Arc::new(storage().await);
    let shared: Arc<dyn Storage> = storage.clone();
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (track, subject, _) = track_with_section(&storage, &inst).await;
    let (quiz, _) = quiz_with_questions(&storage, &inst, &admin, &track, &subject).await;

    let owner = user(&storage, "owner@school.com").await;
    let classmate = user(&storage, "classmate@school.com").await;
    admit_student(&storage, &inst, &owner).await;
    admit_student(&storage, &inst, &classmate).await;

    let attempt = storage
        .create_attempt(&quiz.id, &owner.id, &inst.id)
        .await
        .unwrap();

    attempts::ensure_can_view_attempt(&shared, &owner, &attempt, &quiz)
        .await
        .unwrap();
    attempts::ensure_can_view_attempt(&shared, &admin, &attempt, &quiz)
        .await
        .unwrap();

    let denied = attempts::ensure_can_view_attempt(&shared, &classmate, &attempt, &quiz).await;
    assert!(matches!(denied, Err(TutoriaError::Authorization(_))));

    // 其他机构的用户同样不可见
    let stranger = user(&storage, "stranger@school.com").await;
    let foreign = attempts::ensure_can_view_attempt(&shared, &stranger, &attempt, &quiz).await;
    assert!(matches!(foreign, Err(TutoriaError::Authorization(_))));
}

#[tokio::test]
async fn test_attempt_can_only_be_submitted_once() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (track, subject, _) = track_with_section(&storage, &inst).await;
    let (quiz, questions) = quiz_with_questions(&storage, &inst, &admin, &track, &subject).await;
    let student = user(&storage, "student@school.com").await;

    let attempt = storage
        .create_attempt(&quiz.id, &student.id, &inst.id)
        .await
        .unwrap();
    let submitted = storage
        .submit_attempt(&attempt.id, drafts(&questions), 2.0)
        .await
        .unwrap();
    assert_eq!(submitted.status, AttemptStatus::Completed);
    assert_eq!(submitted.score, 2.0);
    assert!(submitted.completed_at.is_some());

    let again = storage
        .submit_attempt(&attempt.id, drafts(&questions), 7.0)
        .await;
    assert!(matches!(again, Err(TutoriaError::Validation(_))));

    // 第二次提交未改动分数与作答
    let stored = storage.get_attempt(&attempt.id).await.unwrap().unwrap();
    assert_eq!(stored.score, 2.0);
    assert_eq!(storage.list_attempt_responses(&attempt.id).await.unwrap().len(), 2);

    let missing = storage.submit_attempt("no-such-attempt", vec![], 0.0).await;
    assert!(matches!(missing, Err(TutoriaError::NotFound(_))));
}

#[tokio::test]
async fn test_grading_short_answer_recomputes_attempt_score() {
    let storage = storage().await;
    let admin = user(&storage, "admin@school.com").await;
    let inst = institution(&storage, &admin, "DMS").await;
    let (track, subject, _) = track_with_section(&storage, &inst).await;
    let (quiz, questions) = quiz_with_questions(&storage, &inst, &admin, &track, &subject).await;
    let student = user(&storage, "student@school.com").await;

    let attempt = storage
        .create_attempt(&quiz.id, &student.id, &inst.id)
        .await
        .unwrap();
    storage
        .submit_attempt(&attempt.id, drafts(&questions), 2.0)
        .await
        .unwrap();

    let short_response = storage
        .list_attempt_responses(&attempt.id)
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.short_answer.is_some())
        .expect("short answer stored");

    let scorer = |responses: &[crate::models::quiz::entities::QuizResponse]| {
        scoring::attempt_score(&quiz, &questions, responses)
    };
    let graded = storage
        .grade_response(&short_response.id, 4.0, &scorer)
        .await
        .unwrap();
    assert_eq!(graded.manual_score, Some(4.0));
    assert_eq!(graded.is_correct, Some(true));

    let stored = storage.get_attempt(&attempt.id).await.unwrap().unwrap();
    assert_eq!(stored.score, 6.0);

    // 改为零分后总分随之回落
    storage
        .grade_response(&short_response.id, 0.0, &scorer)
        .await
        .unwrap();
    let stored = storage.get_attempt(&attempt.id).await.unwrap().unwrap();
    assert_eq!(stored.score, 2.0);
}
