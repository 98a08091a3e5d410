use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a signed-in account is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    HotelOwner,
    Admin,
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Payload for updating an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// The authenticated identity a procedure runs on behalf of.
///
/// Session handling lives upstream; by the time a procedure runs the
/// caller has been resolved to a stored user and its current role.
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True when the caller is `user_id` or an admin.
    pub fn can_act_for(&self, user_id: &str) -> bool {
        self.is_admin() || self.user_id == user_id
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.role)
    }
}
