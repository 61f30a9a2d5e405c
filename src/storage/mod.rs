//! 存储抽象
//!
//! 按业务领域拆分为多个 trait，由 [`Storage`] 统一组合，服务层只依赖 `Arc<dyn Storage>`。

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationQuery,
    attendance::{
        entities::{Attendance, AttendanceStatus},
        requests::{AttendanceFilter, NewAttendance},
    },
    curriculum::{
        entities::{CurriculumLevel, CurriculumNode, GlobalCurriculumItem, Section},
        requests::{
            CreateGlobalItemRequest, CreateSectionRequest, GlobalItemListParams, NewNode,
            NodeFilter, UpdateGlobalItemRequest, UpdateNodeRequest, UpdateSectionRequest,
        },
    },
    enrollments::{
        entities::{StudentEnrollment, TeacherEnrollment},
        requests::{
            CreateStudentEnrollmentRequest, CreateTeacherEnrollmentRequest, EnrollmentFilter,
            UpdateStudentEnrollmentRequest, UpdateTeacherEnrollmentRequest,
        },
        responses::SectionStudentResponse,
    },
    exams::{
        entities::{Exam, ExamMark},
        requests::{CreateExamMarkRequest, CreateExamRequest, ExamFilter, UpdateExamMarkRequest, UpdateExamRequest},
    },
    fees::entities::{FeeScope, FeeSetting},
    homeworks::{
        entities::{Homework, HomeworkSubmission},
        requests::{CreateHomeworkRequest, HomeworkFilter, MarkSubmissionRequest, UpdateHomeworkRequest},
    },
    institutions::{
        entities::Institution,
        requests::{CreateInstitutionRequest, UpdateInstitutionRequest},
    },
    memberships::{
        entities::{AdmissionRequest, AdmissionStatus, Invitation, Membership, MembershipRole, ParentChild},
        requests::{MemberListParams, NewInvitation},
        responses::{MemberResponse, MyMembershipResponse, ParentChildResponse},
    },
    notices::{
        entities::Notice,
        requests::{CreateNoticeRequest, NoticeFilter, UpdateNoticeRequest},
    },
    payments::{
        entities::{BkashPayment, InstitutionPaymentTracker, PaymentStatus, StudentFeePayment},
        requests::{FeePaymentFilter, NewFeePayment},
    },
    quiz::{
        entities::{Quiz, QuizAttempt, QuizQuestion, QuizResponse},
        requests::{
            AttemptFilter, CreateQuestionRequest, NewQuiz, QuestionListParams, QuizListParams,
            ResponseDraft, UpdateQuestionRequest, UpdateQuizRequest,
        },
    },
    scholarships::entities::Scholarship,
    syllabus::{
        entities::Syllabus,
        requests::{CreateSyllabusRequest, SyllabusFilter, UpdateSyllabusRequest},
    },
    users::{
        entities::User,
        requests::{NewUser, RoleFlagsUpdate, UpdateProfileRequest, UserListParams},
    },
};

pub mod sea_orm_storage;

#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_user_by_phone(&self, phone_number: &str) -> Result<Option<User>>;
    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>>;
    async fn list_users(&self, params: UserListParams) -> Result<PaginatedResponse<User>>;
    async fn update_profile(&self, id: &str, update: UpdateProfileRequest) -> Result<Option<User>>;
    async fn update_password(&self, id: &str, password_hash: &str) -> Result<bool>;
    async fn activate_user(&self, id: &str) -> Result<bool>;
    // 重新注册未激活账号：覆盖密码与角色
    async fn reset_inactive_user(&self, id: &str, user: NewUser) -> Result<Option<User>>;
    async fn update_role_flags(&self, id: &str, flags: RoleFlagsUpdate) -> Result<bool>;
}

#[async_trait]
pub trait InstitutionStorage: Send + Sync {
    /// 同一事务内写入机构与管理员成员关系
    async fn create_institution(
        &self,
        admin_id: &str,
        req: CreateInstitutionRequest,
    ) -> Result<Institution>;
    async fn get_institution_by_id(&self, id: &str) -> Result<Option<Institution>>;
    async fn get_institution_by_short_code(&self, code: &str) -> Result<Option<Institution>>;
    async fn list_institutions_by_admin(&self, admin_id: &str) -> Result<Vec<Institution>>;
    async fn list_all_institutions(&self) -> Result<Vec<Institution>>;
    async fn update_institution(
        &self,
        id: &str,
        update: UpdateInstitutionRequest,
    ) -> Result<Option<Institution>>;
}

#[async_trait]
pub trait MembershipStorage: Send + Sync {
    async fn get_membership(
        &self,
        institution_id: &str,
        user_id: &str,
        role: MembershipRole,
    ) -> Result<Option<Membership>>;
    async fn list_user_memberships(&self, user_id: &str) -> Result<Vec<Membership>>;
    async fn list_my_memberships(&self, user_id: &str) -> Result<Vec<MyMembershipResponse>>;
    async fn list_institution_members(
        &self,
        institution_id: &str,
        params: MemberListParams,
    ) -> Result<PaginatedResponse<MemberResponse>>;

    // 邀请
    async fn create_invitation(&self, invitation: NewInvitation) -> Result<Invitation>;
    async fn list_invitations(&self, institution_id: &str) -> Result<Vec<Invitation>>;
    async fn get_invitation_by_token(&self, token: &str) -> Result<Option<Invitation>>;
    /// 标记邀请已使用、创建成员关系并设置角色标志
    async fn accept_invitation(&self, invitation_id: &str, user_id: &str) -> Result<Membership>;

    // 家长关系
    async fn create_parent_child(&self, parent_id: &str, child_id: &str) -> Result<ParentChild>;
    async fn get_parent_child(&self, parent_id: &str, child_id: &str)
    -> Result<Option<ParentChild>>;
    async fn list_children(&self, parent_id: &str) -> Result<Vec<ParentChildResponse>>;
    async fn list_child_ids(&self, parent_id: &str) -> Result<Vec<String>>;

    // 入学申请
    async fn create_admission_request(
        &self,
        user_id: &str,
        institution_id: &str,
        message: Option<String>,
    ) -> Result<AdmissionRequest>;
    async fn get_admission_request(&self, id: &str) -> Result<Option<AdmissionRequest>>;
    async fn find_pending_admission_request(
        &self,
        user_id: &str,
        institution_id: &str,
    ) -> Result<Option<AdmissionRequest>>;
    async fn list_admission_requests_by_user(
        &self,
        user_id: &str,
        status: Option<AdmissionStatus>,
    ) -> Result<Vec<AdmissionRequest>>;
    async fn list_admission_requests_by_institution(
        &self,
        institution_id: &str,
        status: Option<AdmissionStatus>,
    ) -> Result<Vec<AdmissionRequest>>;
    /// 批准：创建学生成员关系、设置 is_student 并更新状态
    async fn approve_admission_request(
        &self,
        id: &str,
        processed_by: &str,
    ) -> Result<AdmissionRequest>;
    async fn reject_admission_request(
        &self,
        id: &str,
        processed_by: &str,
    ) -> Result<Option<AdmissionRequest>>;
}

#[async_trait]
pub trait CurriculumStorage: Send + Sync {
    // 全局目录
    async fn create_global_item(
        &self,
        level: CurriculumLevel,
        req: CreateGlobalItemRequest,
    ) -> Result<GlobalCurriculumItem>;
    async fn get_global_item(&self, id: &str) -> Result<Option<GlobalCurriculumItem>>;
    async fn list_global_items(
        &self,
        level: CurriculumLevel,
        params: GlobalItemListParams,
    ) -> Result<PaginatedResponse<GlobalCurriculumItem>>;
    async fn update_global_item(
        &self,
        id: &str,
        update: UpdateGlobalItemRequest,
    ) -> Result<Option<GlobalCurriculumItem>>;
    async fn delete_global_item(&self, id: &str) -> Result<bool>;

    // 本地节点
    async fn create_node(&self, node: NewNode) -> Result<CurriculumNode>;
    async fn get_node(&self, id: &str) -> Result<Option<CurriculumNode>>;
    async fn list_nodes(
        &self,
        level: CurriculumLevel,
        filter: NodeFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<CurriculumNode>>;
    async fn list_all_nodes(
        &self,
        level: Option<CurriculumLevel>,
        filter: NodeFilter,
    ) -> Result<Vec<CurriculumNode>>;
    async fn update_node(&self, id: &str, update: UpdateNodeRequest)
    -> Result<Option<CurriculumNode>>;
    async fn delete_node(&self, id: &str) -> Result<bool>;

    // 分组
    async fn create_section(&self, req: CreateSectionRequest) -> Result<Section>;
    async fn get_section(&self, id: &str) -> Result<Option<Section>>;
    async fn get_sections_by_ids(&self, ids: &[String]) -> Result<Vec<Section>>;
    async fn list_sections(
        &self,
        institution_id: &str,
        track_id: Option<&str>,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Section>>;
    async fn update_section(
        &self,
        id: &str,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>>;
    async fn delete_section(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait EnrollmentStorage: Send + Sync {
    async fn create_teacher_enrollment(
        &self,
        req: CreateTeacherEnrollmentRequest,
    ) -> Result<TeacherEnrollment>;
    async fn get_teacher_enrollment(&self, id: &str) -> Result<Option<TeacherEnrollment>>;
    async fn list_teacher_enrollments(
        &self,
        filter: EnrollmentFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<TeacherEnrollment>>;
    /// 教师在（可选）机构内的全部有效授课分配
    async fn list_active_teacher_enrollments(
        &self,
        user_id: &str,
        institution_id: Option<&str>,
    ) -> Result<Vec<TeacherEnrollment>>;
    async fn update_teacher_enrollment(
        &self,
        id: &str,
        update: UpdateTeacherEnrollmentRequest,
    ) -> Result<Option<TeacherEnrollment>>;
    async fn delete_teacher_enrollment(&self, id: &str) -> Result<bool>;

    async fn create_student_enrollment(
        &self,
        req: CreateStudentEnrollmentRequest,
    ) -> Result<StudentEnrollment>;
    async fn get_student_enrollment(&self, id: &str) -> Result<Option<StudentEnrollment>>;
    async fn list_student_enrollments(
        &self,
        filter: EnrollmentFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<StudentEnrollment>>;
    async fn list_all_student_enrollments(
        &self,
        filter: EnrollmentFilter,
    ) -> Result<Vec<StudentEnrollment>>;
    async fn update_student_enrollment(
        &self,
        id: &str,
        update: UpdateStudentEnrollmentRequest,
    ) -> Result<Option<StudentEnrollment>>;
    async fn delete_student_enrollment(&self, id: &str) -> Result<bool>;
    async fn list_section_students(&self, section_id: &str) -> Result<Vec<SectionStudentResponse>>;
}

#[async_trait]
pub trait FeeStorage: Send + Sync {
    async fn create_fee_setting(
        &self,
        institution_id: &str,
        scope: FeeScope,
        target_id: &str,
        amount_minor: i64,
    ) -> Result<FeeSetting>;
    async fn get_fee_setting(&self, id: &str) -> Result<Option<FeeSetting>>;
    async fn find_fee_setting(&self, scope: FeeScope, target_id: &str)
    -> Result<Option<FeeSetting>>;
    async fn list_fee_settings(
        &self,
        institution_ids: &[String],
        scope: Option<FeeScope>,
    ) -> Result<Vec<FeeSetting>>;
    async fn update_fee_setting(&self, id: &str, amount_minor: i64) -> Result<Option<FeeSetting>>;
    async fn delete_fee_setting(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ScholarshipStorage: Send + Sync {
    async fn create_scholarship(
        &self,
        institution_id: &str,
        student_enrollment_id: &str,
        percentage_hundredths: i64,
        is_active: bool,
    ) -> Result<Scholarship>;
    async fn get_scholarship(&self, id: &str) -> Result<Option<Scholarship>>;
    async fn find_scholarship_by_enrollment(
        &self,
        student_enrollment_id: &str,
    ) -> Result<Option<Scholarship>>;
    async fn list_scholarships(&self, institution_ids: &[String]) -> Result<Vec<Scholarship>>;
    async fn update_scholarship(
        &self,
        id: &str,
        percentage_hundredths: Option<i64>,
        is_active: Option<bool>,
    ) -> Result<Option<Scholarship>>;
    async fn delete_scholarship(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait AttendanceStorage: Send + Sync {
    async fn create_attendance(&self, attendance: NewAttendance) -> Result<Attendance>;
    /// 单事务批量写入
    async fn bulk_create_attendance(&self, rows: Vec<NewAttendance>) -> Result<Vec<Attendance>>;
    /// 返回当天已有记录的学生 id
    async fn find_marked_students(
        &self,
        section_id: &str,
        subject_id: &str,
        date: &str,
        student_ids: &[String],
    ) -> Result<Vec<String>>;
    async fn get_attendance(&self, id: &str) -> Result<Option<Attendance>>;
    async fn list_attendance(
        &self,
        filter: AttendanceFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Attendance>>;
    async fn list_all_attendance(&self, filter: AttendanceFilter) -> Result<Vec<Attendance>>;
    async fn update_attendance_status(
        &self,
        id: &str,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>>;
    async fn delete_attendance(&self, id: &str) -> Result<bool>;
}

/// 由作答全集计算总分
pub type AttemptScorer<'a> = &'a (dyn Fn(&[QuizResponse]) -> f64 + Send + Sync);

#[async_trait]
pub trait QuizStorage: Send + Sync {
    // 题库
    async fn create_question(
        &self,
        created_by: &str,
        req: CreateQuestionRequest,
    ) -> Result<QuizQuestion>;
    async fn get_question(&self, id: &str) -> Result<Option<QuizQuestion>>;
    async fn get_questions_by_ids(&self, ids: &[String]) -> Result<Vec<QuizQuestion>>;
    async fn list_questions(
        &self,
        params: QuestionListParams,
    ) -> Result<PaginatedResponse<QuizQuestion>>;
    async fn update_question(
        &self,
        id: &str,
        update: UpdateQuestionRequest,
    ) -> Result<Option<QuizQuestion>>;
    async fn delete_question(&self, id: &str) -> Result<bool>;

    // 测验
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz>;
    async fn get_quiz(&self, id: &str) -> Result<Option<Quiz>>;
    async fn get_quizzes_by_ids(&self, ids: &[String]) -> Result<Vec<Quiz>>;
    async fn list_quizzes_by_creator(
        &self,
        created_by: &str,
        params: QuizListParams,
    ) -> Result<PaginatedResponse<Quiz>>;
    /// 学生可见：所在 track 中有效且已发布的测验
    async fn list_available_quizzes(
        &self,
        track_ids: &[String],
        params: QuizListParams,
    ) -> Result<PaginatedResponse<Quiz>>;
    async fn list_quiz_ids_by_creator(&self, created_by: &str) -> Result<Vec<String>>;
    async fn update_quiz(&self, id: &str, update: UpdateQuizRequest) -> Result<Option<Quiz>>;
    async fn delete_quiz(&self, id: &str) -> Result<bool>;

    // 作答
    async fn find_started_attempt(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> Result<Option<QuizAttempt>>;
    async fn create_attempt(
        &self,
        quiz_id: &str,
        student_id: &str,
        institution_id: &str,
    ) -> Result<QuizAttempt>;
    async fn get_attempt(&self, id: &str) -> Result<Option<QuizAttempt>>;
    async fn list_attempts(
        &self,
        filter: AttemptFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<QuizAttempt>>;
    async fn list_all_attempts(&self, filter: AttemptFilter) -> Result<Vec<QuizAttempt>>;
    /// 写入作答并完成作答记录
    async fn submit_attempt(
        &self,
        attempt_id: &str,
        responses: Vec<ResponseDraft>,
        score: f64,
    ) -> Result<QuizAttempt>;
    async fn list_attempt_responses(&self, attempt_id: &str) -> Result<Vec<QuizResponse>>;
    async fn get_response(&self, id: &str) -> Result<Option<QuizResponse>>;
    /// 人工评分并同步作答总分
    /// 写入人工分，并在同一事务内用 `scorer` 重算作答总分
    async fn grade_response(
        &self,
        response_id: &str,
        manual_score: f64,
        scorer: AttemptScorer<'_>,
    ) -> Result<QuizResponse>;
}

#[async_trait]
pub trait HomeworkStorage: Send + Sync {
    async fn create_homework(&self, created_by: &str, req: CreateHomeworkRequest)
    -> Result<Homework>;
    async fn get_homework(&self, id: &str) -> Result<Option<Homework>>;
    async fn list_homeworks(
        &self,
        filter: HomeworkFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Homework>>;
    async fn update_homework(
        &self,
        id: &str,
        update: UpdateHomeworkRequest,
    ) -> Result<Option<Homework>>;
    async fn delete_homework(&self, id: &str) -> Result<bool>;
    async fn upsert_submission(
        &self,
        homework_id: &str,
        updated_by: &str,
        req: MarkSubmissionRequest,
    ) -> Result<HomeworkSubmission>;
    async fn list_submissions(
        &self,
        homework_id: &str,
        student_ids: Option<Vec<String>>,
    ) -> Result<Vec<HomeworkSubmission>>;
}

#[async_trait]
pub trait ExamStorage: Send + Sync {
    async fn create_exam(&self, created_by: &str, req: CreateExamRequest) -> Result<Exam>;
    async fn get_exam(&self, id: &str) -> Result<Option<Exam>>;
    async fn get_exams_by_ids(&self, ids: &[String]) -> Result<Vec<Exam>>;
    async fn list_exams(
        &self,
        filter: ExamFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Exam>>;
    async fn update_exam(&self, id: &str, update: UpdateExamRequest) -> Result<Option<Exam>>;
    async fn delete_exam(&self, id: &str) -> Result<bool>;

    async fn create_exam_mark(&self, created_by: &str, req: CreateExamMarkRequest)
    -> Result<ExamMark>;
    async fn get_exam_mark(&self, id: &str) -> Result<Option<ExamMark>>;
    async fn find_exam_mark(&self, exam_id: &str, student_id: &str) -> Result<Option<ExamMark>>;
    async fn list_exam_marks(
        &self,
        exam_id: Option<&str>,
        student_ids: Option<Vec<String>>,
    ) -> Result<Vec<ExamMark>>;
    async fn update_exam_mark(
        &self,
        id: &str,
        update: UpdateExamMarkRequest,
    ) -> Result<Option<ExamMark>>;
    async fn delete_exam_mark(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait SyllabusStorage: Send + Sync {
    async fn create_syllabus(&self, created_by: &str, req: CreateSyllabusRequest)
    -> Result<Syllabus>;
    async fn get_syllabus(&self, id: &str) -> Result<Option<Syllabus>>;
    async fn list_syllabi(
        &self,
        filter: SyllabusFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Syllabus>>;
    async fn update_syllabus(
        &self,
        id: &str,
        update: UpdateSyllabusRequest,
    ) -> Result<Option<Syllabus>>;
    async fn delete_syllabus(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait NoticeStorage: Send + Sync {
    async fn create_notice(&self, created_by: &str, req: CreateNoticeRequest) -> Result<Notice>;
    async fn get_notice(&self, id: &str) -> Result<Option<Notice>>;
    async fn list_notices(
        &self,
        filter: NoticeFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Notice>>;
    async fn update_notice(&self, id: &str, update: UpdateNoticeRequest) -> Result<Option<Notice>>;
    async fn delete_notice(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait PaymentStorage: Send + Sync {
    /// 同一事务写入 bKash 支付、学费缴纳与机构结算记录
    async fn create_fee_payment(&self, payment: NewFeePayment) -> Result<StudentFeePayment>;
    /// 某月待支付或已完成的缴费
    async fn find_open_fee_payment(
        &self,
        enrollment_id: &str,
        month: &str,
    ) -> Result<Option<StudentFeePayment>>;
    async fn get_fee_payment(&self, id: &str) -> Result<Option<StudentFeePayment>>;
    async fn list_fee_payments(
        &self,
        filter: FeePaymentFilter,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<StudentFeePayment>>;
    async fn get_bkash_payment(&self, payment_id: &str) -> Result<Option<BkashPayment>>;
    /// 根据网关结果更新 bKash 支付与学费缴纳状态
    async fn finish_payment(
        &self,
        payment_id: &str,
        status: PaymentStatus,
        trx_id: Option<String>,
    ) -> Result<Option<BkashPayment>>;
    async fn list_trackers(
        &self,
        institution_ids: &[String],
        is_disbursed: Option<bool>,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<InstitutionPaymentTracker>>;
    async fn get_tracker(&self, id: &str) -> Result<Option<InstitutionPaymentTracker>>;
    async fn disburse_tracker(&self, id: &str) -> Result<Option<InstitutionPaymentTracker>>;
}

/// 组合后的存储接口
pub trait Storage:
    UserStorage
    + InstitutionStorage
    + MembershipStorage
    + CurriculumStorage
    + EnrollmentStorage
    + FeeStorage
    + ScholarshipStorage
    + AttendanceStorage
    + QuizStorage
    + HomeworkStorage
    + ExamStorage
    + SyllabusStorage
    + NoticeStorage
    + PaymentStorage
{
}

impl<T> Storage for T where
    T: UserStorage
        + InstitutionStorage
        + MembershipStorage
        + CurriculumStorage
        + EnrollmentStorage
        + FeeStorage
        + ScholarshipStorage
        + AttendanceStorage
        + QuizStorage
        + HomeworkStorage
        + ExamStorage
        + SyllabusStorage
        + NoticeStorage
        + PaymentStorage
{
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
