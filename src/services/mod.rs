pub mod auth_service;
pub mod permission_service;
pub mod quiz_service;

pub use auth_service::AuthService;
pub use permission_service::PermissionService;
pub use quiz_service::{score_submission, QuizService};
