use chrono::Utc;

use crate::auth::PasswordHasher;
use crate::domain::role::{ADMIN_ROLE, SALES_ROLE};
use crate::domain::types::EntityId;
use crate::domain::user::{NewUser, User, UserUpdate};
use crate::dto::users::{UserDto, UserPage};
use crate::forms::pagination::ListParams;
use crate::forms::users::{CreateUserForm, CreateUserPayload, UpdateUserForm, UpdateUserPayload};
use crate::forms::{IdPath, path_id};
use crate::repository::{RoleReader, UserReader, UserWriter};
use crate::validation::{
    Pipeline, email, email_available, entity_id, form, min_length, required, role_exists,
    user_exists,
};

use super::{ServiceError, ServiceResult};

pub async fn list_users<R>(params: ListParams, repo: &R) -> ServiceResult<UserPage>
where
    R: UserReader,
{
    Pipeline::new().then(form()).run(&params).await?;

    match repo.list_users(params.to_query()) {
        Ok((total, users)) => Ok(UserPage {
            total,
            usuarios: users.into_iter().map(UserDto::from).collect(),
        }),
        Err(e) => {
            log::error!("Failed to list users: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn create_user<R>(
    form: CreateUserForm,
    repo: &R,
    hasher: &PasswordHasher,
) -> ServiceResult<UserDto>
where
    R: UserReader + UserWriter + RoleReader,
{
    Pipeline::new()
        .then(required("name", "name is required", |f: &CreateUserForm| {
            f.name.clone()
        }))
        .then(min_length(
            "password",
            6,
            "password must have at least 6 characters",
            |f: &CreateUserForm| f.password.clone(),
        ))
        .then(email("email", "email is not valid", |f: &CreateUserForm| {
            f.email.clone()
        }))
        .then(email_available("email", repo, |f: &CreateUserForm| {
            f.email.clone()
        }))
        .then(role_exists("role", repo, |f: &CreateUserForm| f.role.clone()))
        .run(&form)
        .await?;

    let payload = CreateUserPayload::try_from(form)?;
    let password_hash = hasher.hash(&payload.password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;

    let new_user = NewUser {
        id: payload.id,
        name: payload.name,
        email: payload.email,
        password_hash,
        role: payload.role,
        image: None,
        google: false,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_user(&new_user) {
        Ok(user) => {
            log::info!("Created user {}", user.id);
            Ok(user.into())
        }
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub async fn update_user<R>(
    path: IdPath,
    form: UpdateUserForm,
    repo: &R,
    hasher: &PasswordHasher,
) -> ServiceResult<UserDto>
where
    R: UserReader + UserWriter + RoleReader,
{
    Pipeline::new()
        .then(entity_id("id", path_id))
        .then(user_exists("id", repo, path_id))
        .run(&path)
        .await?;
    Pipeline::new()
        .then(role_exists("role", repo, |f: &UpdateUserForm| f.role.clone()))
        .run(&form)
        .await?;

    let id = EntityId::new(path.id)?;
    let payload = UpdateUserPayload::try_from(form)?;
    let password_hash = payload
        .password
        .as_deref()
        .map(|password| hasher.hash(password))
        .transpose()
        .map_err(|e| {
            log::error!("Failed to hash password: {e}");
            ServiceError::Internal
        })?;

    let update = UserUpdate {
        name: payload.name,
        password_hash,
        role: payload.role,
    };

    match repo.update_user(&id, &update) {
        Ok(Some(user)) => Ok(user.into()),
        Ok(None) => Err(ServiceError::EntityNotFound(format!(
            "no user exists with id {id}"
        ))),
        Err(e) => {
            log::error!("Failed to update user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Soft-delete a user. Only administrators and sales staff may do this.
pub async fn delete_user<R>(path: IdPath, actor: &User, repo: &R) -> ServiceResult<UserDto>
where
    R: UserReader + UserWriter,
{
    if !actor.has_any_role(&[ADMIN_ROLE, SALES_ROLE]) {
        return Err(ServiceError::Unauthorized);
    }

    Pipeline::new()
        .then(entity_id("id", path_id))
        .then(user_exists("id", repo, path_id))
        .run(&path)
        .await?;

    let id = EntityId::new(path.id)?;
    match repo.deactivate_user(&id) {
        Ok(Some(user)) => {
            log::info!("User {id} deactivated by {}", actor.id);
            Ok(user.into())
        }
        Ok(None) => Err(ServiceError::EntityNotFound(format!(
            "no user exists with id {id}"
        ))),
        Err(e) => {
            log::error!("Failed to delete user: {e}");
            Err(ServiceError::Internal)
        }
    }
}
