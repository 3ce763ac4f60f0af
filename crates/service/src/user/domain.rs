use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::storage::Record;
use crate::uniqueness::UniqueFields;

/// Domain user (business view); never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Registration input
#[derive(Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("role_id", &self.role_id)
            .finish()
    }
}

/// Self-service changes: only username and email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
}

/// Administrative changes, which may also reassign the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserUpdate {
    pub username: String,
    pub email: String,
    pub role_id: i32,
}

/// The unique fields of a user, in reporting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub username: String,
    pub email: String,
}

/// A user ready for insertion together with its credentials.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub password_hash: String,
    pub password_algorithm: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    pub role_id: Option<i32>,
    /// Case-insensitive substring of "first last".
    pub full_name: Option<String>,
    /// Case-insensitive substring of the username.
    pub username: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity { username: self.username.clone(), email: self.email.clone() }
    }
}

impl UniqueFields for User {
    fn unique_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("username", self.username.as_str()), ("email", self.email.as_str())]
    }
}

impl UniqueFields for UserIdentity {
    fn unique_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("username", self.username.as_str()), ("email", self.email.as_str())]
    }
}

impl Record for User {
    fn id(&self) -> i32 { self.id }
    fn set_id(&mut self, id: i32) { self.id = id; }
}
