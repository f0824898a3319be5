use serde::Deserialize;
use thiserror::Error;

use crate::domain::types::{CategoryName, TypeConstraintError};

/// Body of `POST /categorias` and `PUT /categorias/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(alias = "nombre")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("category form is missing a name")]
    MissingName,
    #[error("category form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        let name = value.name.ok_or(CategoryFormError::MissingName)?;
        Ok(Self {
            name: CategoryName::new(name.to_uppercase())?,
        })
    }
}
