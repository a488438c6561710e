pub mod permission_repository;
pub mod quiz_repository;
pub mod role_repository;
pub mod user_repository;

pub use permission_repository::{MongoPermissionRepository, PermissionRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use role_repository::{MongoRoleRepository, RoleRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

#[cfg(test)]
pub use permission_repository::MockPermissionRepository;
#[cfg(test)]
pub use quiz_repository::MockQuizRepository;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
