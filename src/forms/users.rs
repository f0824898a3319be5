use serde::Deserialize;
use thiserror::Error;

use crate::domain::role::USER_ROLE;
use crate::domain::types::{Email, EntityId, RoleName, TypeConstraintError, UserName};

/// Body of `POST /usuarios`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserForm {
    #[serde(alias = "nombre")]
    pub name: Option<String>,
    #[serde(alias = "correo")]
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "rol")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateUserPayload {
    pub id: EntityId,
    pub name: UserName,
    pub email: Email,
    pub password: String,
    pub role: RoleName,
}

/// Body of `PUT /usuarios/{id}`. Email, id and the Google flag cannot be
/// changed and are ignored when sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserForm {
    #[serde(alias = "nombre")]
    pub name: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "rol")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUserPayload {
    pub name: Option<UserName>,
    pub password: Option<String>,
    pub role: Option<RoleName>,
}

#[derive(Debug, Error)]
pub enum UserFormError {
    #[error("user form is missing {0}")]
    Missing(&'static str),
    #[error("user form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl TryFrom<CreateUserForm> for CreateUserPayload {
    type Error = UserFormError;

    fn try_from(value: CreateUserForm) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EntityId::generate(),
            name: UserName::new(value.name.ok_or(UserFormError::Missing("name"))?)?,
            email: Email::new(value.email.ok_or(UserFormError::Missing("email"))?)?,
            password: value.password.ok_or(UserFormError::Missing("password"))?,
            role: RoleName::new(value.role.unwrap_or_else(|| USER_ROLE.to_string()))?,
        })
    }
}

impl TryFrom<UpdateUserForm> for UpdateUserPayload {
    type Error = UserFormError;

    fn try_from(value: UpdateUserForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.map(UserName::new).transpose()?,
            password: value.password.filter(|password| !password.is_empty()),
            role: value.role.map(RoleName::new).transpose()?,
        })
    }
}
