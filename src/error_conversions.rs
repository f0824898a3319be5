//! Conversions from lower-layer errors into [`ServiceError`].
//!
//! Client-caused failures keep their message; storage failures are logged
//! here and surface only as [`ServiceError::Internal`].

use crate::domain::collection::UnknownCollection;
use crate::domain::types::TypeConstraintError;
use crate::forms::categories::CategoryFormError;
use crate::forms::products::ProductFormError;
use crate::forms::users::UserFormError;
use crate::services::errors::ServiceError;
use crate::validation::CheckError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<UnknownCollection> for ServiceError {
    fn from(val: UnknownCollection) -> Self {
        ServiceError::UnknownCollection(val.to_string())
    }
}

impl From<CheckError> for ServiceError {
    fn from(val: CheckError) -> Self {
        match val {
            CheckError::Invalid(error) => ServiceError::Validation(vec![error]),
            CheckError::Repository(e) => {
                log::error!("Storage lookup failed during validation: {e}");
                ServiceError::Internal
            }
        }
    }
}

impl From<UserFormError> for ServiceError {
    fn from(val: UserFormError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}
