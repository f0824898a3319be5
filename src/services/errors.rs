use thiserror::Error;

use crate::validation::FieldError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// A declared request check failed.
    #[error("request validation failed")]
    Validation(Vec<FieldError>),
    /// A collection tag outside the set accepted by the endpoint.
    #[error("{0}")]
    UnknownCollection(String),
    /// The addressed entity does not exist.
    #[error("{0}")]
    EntityNotFound(String),
    /// The request is well formed but conflicts with stored data.
    #[error("{0}")]
    Form(String),
    /// A value could not be turned into a domain type.
    #[error("{0}")]
    TypeConstraint(String),
    /// Email or password did not match an active user.
    #[error("user / password are not correct")]
    InvalidCredentials,
    /// Google did not accept the ID token.
    #[error("the Google token is not valid")]
    InvalidGoogleToken,
    /// The account has been deactivated.
    #[error("the user is blocked, contact an administrator")]
    Blocked,
    /// The user is not authorized to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// An unexpected internal error occurred.
    #[error("internal error, contact an administrator")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
