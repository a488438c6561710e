pub mod claims;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::Claims;
pub use guard::{require_permission, require_role};
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
