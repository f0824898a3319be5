use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::attachment::AttachmentRef;
use crate::domain::types::{Email, EntityId, RoleName, UserName};

/// A registered user. Inactive users are soft-deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: EntityId,
    pub name: UserName,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: RoleName,
    pub image: Option<AttachmentRef>,
    pub active: bool,
    /// Whether the account was created through Google sign-in.
    pub google: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Whether the user holds any of `roles`.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.role.as_str() == *role)
    }
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: EntityId,
    pub name: UserName,
    pub email: Email,
    pub password_hash: String,
    pub role: RoleName,
    pub image: Option<AttachmentRef>,
    pub google: bool,
    pub created_at: NaiveDateTime,
}

/// Fields a user update may change. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<UserName>,
    pub password_hash: Option<String>,
    pub role: Option<RoleName>,
}
