use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::User;

/// JWT claims carried by every issued token.
///
/// Role names and permission strings are snapshotted at issue time. Editing a
/// role or permission does not touch tokens already in the wild; callers see
/// the new grants only after the next login issues a fresh token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub username: String,
    pub email: String,
    /// Role names assigned to the user at issue time.
    pub roles: Vec<String>,
    /// Deduplicated `resource:action` strings flattened across those roles.
    pub permissions: Vec<String>,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    pub fn new(user: &User, roles: &[String], permissions: &[String], expiration_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: roles.to_vec(),
            permissions: permissions.to_vec(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiration_hours)).timestamp(),
        }
    }
}
