pub mod answer;
pub mod permission;
pub mod question;
pub mod quiz;
pub mod role;
pub mod user;

pub use answer::{Answer, NewAnswer};
pub use permission::{NewPermission, Permission};
pub use question::{NewQuestion, Question};
pub use quiz::{NewQuiz, Quiz};
pub use role::{NewRole, Role};
pub use user::{NewUser, User};
