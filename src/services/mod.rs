pub mod access;
pub mod attendance;
pub mod auth;
pub mod curriculum;
pub mod enrollments;
pub mod exams;
pub mod fees;
pub mod homeworks;
pub mod institutions;
pub mod memberships;
pub mod notices;
pub mod notify;
pub mod payments;
pub mod quiz;
pub mod results;
pub mod scholarships;
pub mod syllabus;
pub mod users;

use std::sync::Arc;

use actix_web::{HttpRequest, web};

use crate::cache::ObjectCache;
use crate::errors::{Result, TutoriaError};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::storage::Storage;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use curriculum::CurriculumService;
pub use enrollments::EnrollmentService;
pub use exams::ExamService;
pub use fees::FeeService;
pub use homeworks::HomeworkService;
pub use institutions::InstitutionService;
pub use memberships::MembershipService;
pub use notices::NoticeService;
pub use payments::PaymentService;
pub use quiz::QuizService;
pub use results::ResultService;
pub use scholarships::ScholarshipService;
pub use syllabus::SyllabusService;
pub use users::UserService;

/// 声明服务结构体：存储懒加载自 app_data，测试时可直接注入
macro_rules! define_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            #[allow(dead_code)]
            pub fn with_storage(storage: std::sync::Arc<dyn $crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> $crate::errors::Result<std::sync::Arc<dyn $crate::storage::Storage>> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => $crate::services::app_storage(request),
                }
            }
        }
    };
}
pub(crate) use define_service;

pub(crate) fn app_storage(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| TutoriaError::internal_server("Storage not found in app data"))
}

pub(crate) fn app_cache(request: &HttpRequest) -> Result<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| TutoriaError::internal_server("Cache not found in app data"))
}

/// 当前登录用户，未认证时返回 401
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| TutoriaError::authentication("Unauthorized access, please login"))
}
