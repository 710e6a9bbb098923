//! Response conversion helpers

use serde::{Deserialize, Serialize};

use crate::db::models::User;

/// Public user view (credential hash stripped)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: String,
    pub created_at: i64,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string(),
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
