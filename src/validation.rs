//! Composable request checks.
//!
//! A route builds a [`Pipeline`] from the checks it needs and runs it against
//! the deserialized request payload. Checks run in declaration order and the
//! first failure ends the run.

use futures::future::{self, LocalBoxFuture};
use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidateEmail};

use crate::domain::attachment::IMAGE_EXTENSIONS;
use crate::domain::collection::EntityTag;
use crate::domain::types::EntityId;
use crate::repository::{
    CategoryReader, ProductReader, RepositoryError, RepositoryResult, RoleReader, UserReader,
};

/// A single failed check, rendered as `{ "field", "message" }`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Why a pipeline stopped.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{0}")]
    Invalid(FieldError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A check over a request payload of type `P`.
pub trait Check<P> {
    fn run<'p>(&'p self, payload: &'p P) -> LocalBoxFuture<'p, Result<(), CheckError>>;
}

/// Ordered list of checks.
pub struct Pipeline<'a, P> {
    checks: Vec<Box<dyn Check<P> + 'a>>,
}

impl<P> Default for Pipeline<'_, P> {
    fn default() -> Self {
        Self { checks: Vec::new() }
    }
}

impl<'a, P> Pipeline<'a, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `check` after the ones already declared.
    pub fn then(mut self, check: impl Check<P> + 'a) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check in order, stopping at the first failure.
    pub async fn run(&self, payload: &P) -> Result<(), CheckError> {
        for check in &self.checks {
            check.run(payload).await?;
        }
        Ok(())
    }
}

type Rule = Box<dyn Fn(Option<&str>) -> Result<(), String>>;

/// Synchronous check over one extracted value.
pub struct FieldCheck<V> {
    field: &'static str,
    value: V,
    rule: Rule,
}

impl<P, V> Check<P> for FieldCheck<V>
where
    V: Fn(&P) -> Option<String>,
{
    fn run<'p>(&'p self, payload: &'p P) -> LocalBoxFuture<'p, Result<(), CheckError>> {
        let value = (self.value)(payload);
        let result = (self.rule)(value.as_deref())
            .map_err(|message| CheckError::Invalid(FieldError::new(self.field, message)));
        Box::pin(future::ready(result))
    }
}

fn field_check<V>(
    field: &'static str,
    value: V,
    rule: impl Fn(Option<&str>) -> Result<(), String> + 'static,
) -> FieldCheck<V> {
    FieldCheck {
        field,
        value,
        rule: Box::new(rule),
    }
}

/// Value must be present and not blank.
pub fn required<V>(field: &'static str, message: &'static str, value: V) -> FieldCheck<V> {
    field_check(field, value, move |value| match value {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(message.to_string()),
    })
}

/// Value must be present with at least `min` characters.
pub fn min_length<V>(
    field: &'static str,
    min: usize,
    message: &'static str,
    value: V,
) -> FieldCheck<V> {
    field_check(field, value, move |value| match value {
        Some(value) if value.chars().count() >= min => Ok(()),
        _ => Err(message.to_string()),
    })
}

/// Value must be a well-formed email address.
pub fn email<V>(field: &'static str, message: &'static str, value: V) -> FieldCheck<V> {
    field_check(field, value, move |value| match value {
        Some(value) if value.validate_email() => Ok(()),
        _ => Err(message.to_string()),
    })
}

/// Value must have the shape of an [`EntityId`].
pub fn entity_id<V>(field: &'static str, value: V) -> FieldCheck<V> {
    field_check(field, value, |value| match value {
        Some(value) if EntityId::is_valid(value) => Ok(()),
        Some(value) => Err(format!("`{value}` is not a valid id")),
        None => Err("an id is required".to_string()),
    })
}

/// A file must have been uploaded. `value` yields the client file name.
pub fn file_present<V>(field: &'static str, value: V) -> FieldCheck<V> {
    field_check(field, value, |value| match value {
        Some(_) => Ok(()),
        None => Err("no file was uploaded".to_string()),
    })
}

/// The uploaded file name must end in one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn extension<V>(field: &'static str, value: V) -> FieldCheck<V> {
    field_check(field, value, |value| {
        let extension = value
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, extension)| extension.to_ascii_lowercase())
            .unwrap_or_default();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Ok(())
        } else {
            Err(format!(
                "extension `{extension}` is not allowed; allowed extensions are: {}",
                IMAGE_EXTENSIONS.join(", ")
            ))
        }
    })
}

/// The collection tag must belong to `allowed`.
pub fn collection<V>(field: &'static str, allowed: &'static [EntityTag], value: V) -> FieldCheck<V> {
    field_check(field, value, move |value| {
        EntityTag::resolve_in(value.unwrap_or_default(), allowed)
            .map(|_| ())
            .map_err(|err| err.to_string())
    })
}

/// Runs the `validator` derives of the payload and reports the first failure.
pub struct FormCheck;

/// Check the payload's own `#[validate(...)]` rules.
pub fn form() -> FormCheck {
    FormCheck
}

impl<P: Validate> Check<P> for FormCheck {
    fn run<'p>(&'p self, payload: &'p P) -> LocalBoxFuture<'p, Result<(), CheckError>> {
        let result = payload.validate().map_err(|errors| {
            let first = errors
                .field_errors()
                .into_iter()
                .min_by(|(left, _), (right, _)| left.cmp(right))
                .map(|(field, errors)| {
                    let message = errors
                        .first()
                        .and_then(|error| error.message.as_ref().map(ToString::to_string))
                        .unwrap_or_else(|| format!("{field} is invalid"));
                    FieldError::new(field.to_string(), message)
                })
                .unwrap_or_else(|| FieldError::new("form", errors.to_string()));
            CheckError::Invalid(first)
        });
        Box::pin(future::ready(result))
    }
}

type Lookup<'a, R> = Box<dyn Fn(&R, &str) -> RepositoryResult<Result<(), String>> + 'a>;

/// Check that consults storage. An absent value is left to other checks.
pub struct StorageCheck<'a, R, V> {
    field: &'static str,
    repo: &'a R,
    value: V,
    lookup: Lookup<'a, R>,
}

impl<P, R, V> Check<P> for StorageCheck<'_, R, V>
where
    V: Fn(&P) -> Option<String>,
{
    fn run<'p>(&'p self, payload: &'p P) -> LocalBoxFuture<'p, Result<(), CheckError>> {
        Box::pin(async move {
            let Some(value) = (self.value)(payload) else {
                return Ok(());
            };
            (self.lookup)(self.repo, &value)?
                .map_err(|message| CheckError::Invalid(FieldError::new(self.field, message)))
        })
    }
}

fn storage_check<'a, R, V>(
    field: &'static str,
    repo: &'a R,
    value: V,
    lookup: impl Fn(&R, &str) -> RepositoryResult<Result<(), String>> + 'a,
) -> StorageCheck<'a, R, V> {
    StorageCheck {
        field,
        repo,
        value,
        lookup: Box::new(lookup),
    }
}

/// The named role must exist.
pub fn role_exists<'a, R: RoleReader, V>(
    field: &'static str,
    repo: &'a R,
    value: V,
) -> StorageCheck<'a, R, V> {
    storage_check(field, repo, value, |repo: &R, name: &str| {
        Ok(match repo.get_role(name)? {
            Some(_) => Ok(()),
            None => Err(format!("role {name} is not registered")),
        })
    })
}

/// No user may already be registered with the email.
pub fn email_available<'a, R: UserReader, V>(
    field: &'static str,
    repo: &'a R,
    value: V,
) -> StorageCheck<'a, R, V> {
    storage_check(field, repo, value, |repo: &R, email: &str| {
        Ok(match repo.get_user_by_email(email.trim())? {
            Some(_) => Err(format!("email {email} is already registered")),
            None => Ok(()),
        })
    })
}

fn parse_id(value: &str) -> Option<EntityId> {
    EntityId::new(value).ok()
}

/// A user with the id must exist, active or not.
pub fn user_exists<'a, R: UserReader, V>(
    field: &'static str,
    repo: &'a R,
    value: V,
) -> StorageCheck<'a, R, V> {
    storage_check(field, repo, value, |repo: &R, id: &str| {
        let found = match parse_id(id) {
            Some(id) => repo.get_user_by_id(&id)?.is_some(),
            None => false,
        };
        Ok(found
            .then_some(())
            .ok_or_else(|| format!("no user exists with id {id}")))
    })
}

/// A category with the id must exist, active or not.
pub fn category_exists<'a, R: CategoryReader, V>(
    field: &'static str,
    repo: &'a R,
    value: V,
) -> StorageCheck<'a, R, V> {
    storage_check(field, repo, value, |repo: &R, id: &str| {
        let found = match parse_id(id) {
            Some(id) => repo.get_category_by_id(&id)?.is_some(),
            None => false,
        };
        Ok(found
            .then_some(())
            .ok_or_else(|| format!("no category exists with id {id}")))
    })
}

/// A product with the id must exist, active or not.
pub fn product_exists<'a, R: ProductReader, V>(
    field: &'static str,
    repo: &'a R,
    value: V,
) -> StorageCheck<'a, R, V> {
    storage_check(field, repo, value, |repo: &R, id: &str| {
        let found = match parse_id(id) {
            Some(id) => repo.get_product_by_id(&id)?.is_some(),
            None => false,
        };
        Ok(found
            .then_some(())
            .ok_or_else(|| format!("no product exists with id {id}")))
    })
}
