use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::attachment::AttachmentRef;
use crate::domain::types::{Email, RoleName, TypeConstraintError, UserName};
use crate::domain::user::{
    NewUser as DomainNewUser, User as DomainUser, UserUpdate as DomainUserUpdate,
};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub image: Option<String>,
    pub image_source: Option<String>,
    pub image_public_id: Option<String>,
    pub active: bool,
    pub google: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`User`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub image: Option<String>,
    pub image_source: Option<String>,
    pub image_public_id: Option<String>,
    pub google: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patch applied by an update; `None` fields are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangeset {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl UserChangeset {
    pub fn new(update: &DomainUserUpdate, updated_at: NaiveDateTime) -> Self {
        Self {
            name: update.name.as_ref().map(|name| name.as_str().to_string()),
            password_hash: update.password_hash.clone(),
            role: update.role.as_ref().map(|role| role.as_str().to_string()),
            updated_at,
        }
    }
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            name: UserName::new(user.name)?,
            email: Email::new(user.email)?,
            password_hash: user.password_hash,
            role: RoleName::new(user.role)?,
            image: AttachmentRef::from_columns(
                user.image,
                user.image_source,
                user.image_public_id,
            )?,
            active: user.active,
            google: user.google,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

impl From<DomainNewUser> for NewUser {
    fn from(user: DomainNewUser) -> Self {
        let image = user.image.as_ref();
        Self {
            id: user.id.into_inner(),
            name: user.name.into_inner(),
            email: user.email.into_inner(),
            password_hash: user.password_hash,
            role: user.role.into_inner(),
            image: image.map(|image| image.location().to_string()),
            image_source: image.map(|image| image.source().to_string()),
            image_public_id: image
                .and_then(AttachmentRef::public_id)
                .map(|public_id| public_id.as_str().to_string()),
            google: user.google,
            created_at: user.created_at,
            updated_at: user.created_at,
        }
    }
}
