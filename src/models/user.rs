use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp;

/// The `User` struct is the profile returned by the backend for the
/// currently authenticated account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, alias = "isAdmin")]
    pub is_admin: bool,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
    #[serde(default, alias = "createdAt", with = "timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, alias = "updatedAt", with = "timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, alias = "lastLogin", with = "timestamp")]
    pub last_login: Option<NaiveDateTime>,
}

fn default_active() -> bool {
    true
}

/// Login credentials. Only ever held for the duration of one request.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration payload. `confirm_password` is checked locally and never sent.
#[derive(Serialize, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("age", &self.age)
            .finish_non_exhaustive()
    }
}

impl NewUser {
    /// Credentials to log in with once the account exists.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

/// A partial profile update: only the fields that are `Some` are sent.
#[derive(Serialize, Clone, Default)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.age.is_none()
            && self.current_password.is_none()
            && self.new_password.is_none()
    }
}
