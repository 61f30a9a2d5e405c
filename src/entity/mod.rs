//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod admission_requests;
pub mod attendances;
pub mod bkash_payments;
pub mod curriculum_nodes;
pub mod exam_marks;
pub mod exams;
pub mod fee_settings;
pub mod global_curriculum_items;
pub mod homework_submissions;
pub mod homeworks;
pub mod institution_memberships;
pub mod institution_payment_trackers;
pub mod institutions;
pub mod invitations;
pub mod notices;
pub mod parent_child_relationships;
pub mod quiz_attempts;
pub mod quiz_items;
pub mod quiz_options;
pub mod quiz_questions;
pub mod quiz_responses;
pub mod quizzes;
pub mod scholarships;
pub mod sections;
pub mod student_enrollments;
pub mod student_fee_payments;
pub mod syllabi;
pub mod syllabus_items;
pub mod teacher_enrollment_links;
pub mod teacher_enrollments;
pub mod users;

/// 解析存储的枚举字符串，未知值回退为默认值
pub(crate) fn parse_or<T: std::str::FromStr>(value: &str, fallback: T) -> T {
    value.parse().unwrap_or(fallback)
}
