use serde::{Deserialize, Serialize};

/// A single grantable capability, addressed as `resource:action`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Permission {
    pub id: i64,
    /// Human-facing label, unique across permissions.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resource: String,
    pub action: String,
}

impl Permission {
    /// The exact string the authorization guard compares against.
    pub fn permission_string(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

/// Insert payload; the repository assigns the id.
#[derive(Clone, Debug)]
pub struct NewPermission {
    pub name: String,
    pub description: Option<String>,
    pub resource: String,
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_string_joins_resource_and_action() {
        let permission = Permission {
            id: 1,
            name: "Read quizzes".to_string(),
            description: None,
            resource: "quiz".to_string(),
            action: "read".to_string(),
        };

        assert_eq!(permission.permission_string(), "quiz:read");
    }

    #[test]
    fn test_permission_string_preserves_case() {
        let permission = Permission {
            id: 2,
            name: "Odd casing".to_string(),
            description: None,
            resource: "Quiz".to_string(),
            action: "Read".to_string(),
        };

        assert_eq!(permission.permission_string(), "Quiz:Read");
    }
}
