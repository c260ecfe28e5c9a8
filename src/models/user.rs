//! Session user and authentication payloads.

use serde::{Deserialize, Serialize};

use super::wire::{lenient_bool, lenient_id};
use crate::error::ValidationError;

/// The signed-in user as reported by `/api/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u64,
    pub username: String,
    #[serde(default, rename = "displayUsername")]
    pub display_username: Option<String>,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "admin", alias = "isAdmin", deserialize_with = "lenient_bool")]
    pub is_admin: bool,
}

impl User {
    /// Name to show in headers; falls back to the username.
    pub fn label(&self) -> &str {
        self.display_username
            .as_deref()
            .or(self.display_name.as_deref())
            .or(self.name.as_deref())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Exercise edit and delete controls are admin-only.
    pub fn can_manage_exercises(&self) -> bool {
        self.is_admin
    }
}

/// `/api/me` body: `{user: {...}}`, `{user: null}`, or the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MeResponse {
    Bare(User),
    Wrapped { user: Option<User> },
}

impl MeResponse {
    pub(crate) fn into_user(self) -> Option<User> {
        match self {
            MeResponse::Wrapped { user } => user,
            MeResponse::Bare(user) => Some(user),
        }
    }
}

/// POST `/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("email", &self.email)?;
        ValidationError::require("password", &self.password)
    }
}

/// POST `/register` body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("name", &self.name)?;
        ValidationError::require("username", &self.username)?;
        ValidationError::require("email", &self.email)?;
        ValidationError::require("password", &self.password)
    }
}
