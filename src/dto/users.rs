use serde::Serialize;

use crate::domain::user::User;

/// Public view of a user; the password hash is never exposed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub image: Option<String>,
    pub active: bool,
    pub google: bool,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.into_inner(),
            name: value.name.into_inner(),
            email: value.email.into_inner(),
            role: value.role.into_inner(),
            image: value.image.as_ref().map(|image| image.location().to_string()),
            active: value.active,
            google: value.google,
        }
    }
}

/// One page of active users.
#[derive(Debug, Serialize)]
pub struct UserPage {
    pub total: usize,
    pub usuarios: Vec<UserDto>,
}
