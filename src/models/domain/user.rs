use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. `role_ids` are the role assignments; the roles
/// themselves live in their own collection.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    #[serde(default)]
    pub role_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: i64, username: String, email: String, password_hash: String) -> Self {
        User {
            id,
            username,
            email,
            password_hash,
            is_active: true,
            role_ids: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }
}

/// Insert payload; the repository assigns the id.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active_with_no_roles() {
        let user = User::new(1, "johndoe".to_string(), "john@example.com".to_string(), "h".to_string());

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "johndoe");
        assert_eq!(user.email, "john@example.com");
        assert!(user.is_active);
        assert!(user.role_ids.is_empty());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_user_deserializes_without_role_ids() {
        // Documents written before role support lack the array entirely
        let json = r#"{"id":2,"username":"old","email":"old@example.com","password_hash":"h","is_active":true}"#;
        let user: User = serde_json::from_str(json).expect("deserialize user");
        assert!(user.role_ids.is_empty());
    }
}
