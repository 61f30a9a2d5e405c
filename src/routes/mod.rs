pub mod attendance;
pub mod auth;
pub mod curriculum;
pub mod enrollments;
pub mod exams;
pub mod fees;
pub mod health;
pub mod homeworks;
pub mod institutions;
pub mod memberships;
pub mod notices;
pub mod payments;
pub mod quiz;
pub mod results;
pub mod syllabus;
pub mod users;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use curriculum::configure_curriculum_routes;
pub use enrollments::configure_enrollment_routes;
pub use exams::configure_exam_routes;
pub use fees::{configure_fee_routes, configure_scholarship_routes};
pub use health::configure_health_routes;
pub use homeworks::configure_homework_routes;
pub use institutions::configure_institution_routes;
pub use memberships::configure_membership_routes;
pub use notices::configure_notice_routes;
pub use payments::configure_payment_routes;
pub use quiz::configure_quiz_routes;
pub use results::configure_result_routes;
pub use syllabus::configure_syllabus_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_all(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_institution_routes)
        .configure(configure_membership_routes)
        .configure(configure_curriculum_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_fee_routes)
        .configure(configure_scholarship_routes)
        .configure(configure_attendance_routes)
        .configure(configure_quiz_routes)
        .configure(configure_homework_routes)
        .configure(configure_exam_routes)
        .configure(configure_syllabus_routes)
        .configure(configure_notice_routes)
        .configure(configure_result_routes)
        .configure(configure_payment_routes);
}
