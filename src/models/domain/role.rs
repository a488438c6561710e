use serde::{Deserialize, Serialize};

/// A named bundle of permissions. Users reference roles by id, roles
/// reference permissions by id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permission_ids: Vec<i64>,
}

/// Insert payload; the repository assigns the id.
#[derive(Clone, Debug)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
    pub permission_ids: Vec<i64>,
}
