use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult},
};

/// Checks that the claims grant `resource:action`.
///
/// The comparison is exact string equality, case sensitive. `"quiz:read"`
/// does not satisfy a requirement for `"Quiz:read"` and no wildcard or
/// hierarchy semantics exist.
pub fn require_permission(claims: &Claims, resource: &str, action: &str) -> AppResult<()> {
    let required = format!("{}:{}", resource, action);
    if claims.permissions.iter().any(|granted| granted == &required) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Permission denied: {}", required)))
    }
}

/// Checks that the claims carry the named role. Exact match, like
/// [`require_permission`].
pub fn require_role(claims: &Claims, role_name: &str) -> AppResult<()> {
    if claims.roles.iter().any(|role| role == role_name) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Role required: {}", role_name)))
    }
}
