//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// User ID type
pub type UserId = RecordId;

pub const ROLE_REPORTER: &str = "reporter";
pub const ROLE_VOLUNTEER: &str = "volunteer";
pub const ROLE_ADMIN: &str = "admin";

/// User record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub username: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    /// "reporter" | "volunteer" | "admin"
    pub role: String,
    /// Creation time (Unix millis)
    #[serde(default)]
    pub created_at: i64,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl User {
    /// Record id as "user:key" string
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = User::hash_password("pw123").expect("hashing failed");
        let user = User {
            id: None,
            username: "alice".to_string(),
            hash_pass: hash,
            role: ROLE_REPORTER.to_string(),
            created_at: 0,
        };
        assert!(user.verify_password("pw123").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }
}
