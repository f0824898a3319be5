//! Strongly-typed value objects used by domain entities.
//!
//! Entities carry these wrappers instead of raw strings so identifiers, names
//! and numeric constraints are checked once at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;
use validator::{ValidateEmail, ValidateUrl};

/// Number of hexadecimal characters in an [`EntityId`].
pub const ENTITY_ID_LEN: usize = 32;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier did not have the expected hexadecimal shape.
    #[error("{0} is not a valid identifier")]
    InvalidId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// Email validation failed.
    #[error("{0} must be a valid email")]
    InvalidEmail(&'static str),
    /// URL validation failed.
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
    /// A numeric value required to be non-negative was negative or not finite.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Identifier shared by every stored entity: 32 lowercase hex characters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Parses an identifier, accepting upper-case hex and normalising it.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if Self::is_valid(&value) {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(TypeConstraintError::InvalidId("id"))
        }
    }

    /// Whether `value` has the identifier shape, without allocating.
    pub fn is_valid(value: &str) -> bool {
        value.len() == ENTITY_ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Generates a trimmed string newtype. The optional `check` expression is run
/// against the trimmed value and must return `Result<(), TypeConstraintError>`.
macro_rules! string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        string_newtype!($name, $doc, $field, |_value: &str| Ok(()));
    };
    ($name:ident, $doc:expr, $field:expr, $check:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty, validated value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                let check: fn(&str) -> Result<(), TypeConstraintError> = $check;
                check(&trimmed)?;
                Ok(Self(trimmed))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

string_newtype!(UserName, "Display name of a user.", "name");
string_newtype!(
    Email,
    "Email address used as the login of a user.",
    "email",
    |value: &str| {
        if value.validate_email() {
            Ok(())
        } else {
            Err(TypeConstraintError::InvalidEmail("email"))
        }
    }
);
string_newtype!(RoleName, "Name of a role such as `ADMIN_ROLE`.", "role");
string_newtype!(CategoryName, "Upper-cased category name.", "category name");
string_newtype!(ProductName, "Upper-cased product name.", "product name");
string_newtype!(
    ProductDescription,
    "Free-form product description.",
    "description"
);
string_newtype!(
    FileName,
    "Bare file name of a locally stored upload.",
    "file name",
    |value: &str| {
        if value.contains(['/', '\\']) || value == "." || value == ".." {
            Err(TypeConstraintError::InvalidValue(format!(
                "file name: {value}"
            )))
        } else {
            Ok(())
        }
    }
);
string_newtype!(ImageUrl, "Absolute URL of a remote image.", "image url", |value: &str| {
    if value.validate_url() {
        Ok(())
    } else {
        Err(TypeConstraintError::InvalidUrl("image url"))
    }
});
string_newtype!(
    PublicId,
    "Identifier of an object held by the hosted image service.",
    "public id"
);

/// Identifier and display name of a related entity, used when rendering relations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityRef {
    pub id: EntityId,
    pub name: String,
}

/// Non-negative price in standard currency units.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct ProductPrice(f64);

impl ProductPrice {
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("price"))
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for ProductPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for ProductPrice {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductPrice> for f64 {
    fn from(value: ProductPrice) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid() {
        let id = EntityId::generate();
        assert!(EntityId::is_valid(id.as_str()));
        assert_eq!(id.as_str().len(), ENTITY_ID_LEN);
    }

    #[test]
    fn entity_id_is_normalised_to_lowercase() {
        let id = EntityId::new("0123456789ABCDEF0123456789ABCDEF").unwrap();
        assert_eq!(id, "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(EntityId::new("widget").is_err());
        assert!(EntityId::new("0123456789abcdef0123456789abcdeg").is_err());
        assert!(EntityId::new("0123456789abcdef").is_err());
    }

    #[test]
    fn trims_names() {
        let name = CategoryName::new("  DRINKS ").unwrap();
        assert_eq!(name.as_str(), "DRINKS");
        assert_eq!(
            ProductName::new("   ").unwrap_err(),
            TypeConstraintError::EmptyString("product name")
        );
    }

    #[test]
    fn validates_emails() {
        assert!(Email::new("ana@example.com").is_ok());
        assert_eq!(
            Email::new("ana-at-example").unwrap_err(),
            TypeConstraintError::InvalidEmail("email")
        );
    }

    #[test]
    fn file_names_cannot_escape_their_folder() {
        assert!(FileName::new("a1b2.png").is_ok());
        assert!(FileName::new("../secrets.png").is_err());
        assert!(FileName::new("..").is_err());
    }

    #[test]
    fn product_price_allows_zero_but_not_negative() {
        assert_eq!(ProductPrice::new(0.0).unwrap().get(), 0.0);
        assert_eq!(
            ProductPrice::new(-0.01).unwrap_err(),
            TypeConstraintError::NegativeNumber("price")
        );
    }
}
