use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed-up faculty member as kept in the local user directory.
///
/// The password is stored as entered; this directory is a local mock and
/// must not be used for real accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Public profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Credential {
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password,
            created_at: Some(Utc::now()),
        }
    }

    /// Profile with the password stripped
    pub fn profile(&self) -> CurrentUser {
        CurrentUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}
