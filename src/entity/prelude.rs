//! 预导入模块，方便使用

pub use super::admission_requests::Entity as AdmissionRequests;
pub use super::attendances::Entity as Attendances;
pub use super::bkash_payments::Entity as BkashPayments;
pub use super::curriculum_nodes::Entity as CurriculumNodes;
pub use super::exam_marks::Entity as ExamMarks;
pub use super::exams::Entity as Exams;
pub use super::fee_settings::Entity as FeeSettings;
pub use super::global_curriculum_items::Entity as GlobalCurriculumItems;
pub use super::homework_submissions::Entity as HomeworkSubmissions;
pub use super::homeworks::Entity as Homeworks;
pub use super::institution_memberships::Entity as InstitutionMemberships;
pub use super::institution_payment_trackers::Entity as InstitutionPaymentTrackers;
pub use super::institutions::Entity as Institutions;
pub use super::invitations::Entity as Invitations;
pub use super::notices::Entity as Notices;
pub use super::parent_child_relationships::Entity as ParentChildRelationships;
pub use super::quiz_attempts::Entity as QuizAttempts;
pub use super::quiz_items::Entity as QuizItems;
pub use super::quiz_options::Entity as QuizOptions;
pub use super::quiz_questions::Entity as QuizQuestions;
pub use super::quiz_responses::Entity as QuizResponses;
pub use super::quizzes::Entity as Quizzes;
pub use super::scholarships::Entity as Scholarships;
pub use super::sections::Entity as Sections;
pub use super::student_enrollments::Entity as StudentEnrollments;
pub use super::student_fee_payments::Entity as StudentFeePayments;
pub use super::syllabi::Entity as Syllabi;
pub use super::syllabus_items::Entity as SyllabusItems;
pub use super::teacher_enrollment_links::Entity as TeacherEnrollmentLinks;
pub use super::teacher_enrollments::Entity as TeacherEnrollments;
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
