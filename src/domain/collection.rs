//! Collection tags accepted by the generic search and upload endpoints.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

/// Entity type selected by a collection tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum EntityTag {
    User,
    Category,
    Product,
}

/// Every collection the service knows about, in the order they are listed to clients.
pub const ALL_COLLECTIONS: &[EntityTag] = &[EntityTag::User, EntityTag::Category, EntityTag::Product];

/// Collections whose entities carry an image.
pub const IMAGE_COLLECTIONS: &[EntityTag] = &[EntityTag::User, EntityTag::Product];

/// Raised when a tag is not in the set accepted by an endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("collection `{tag}` is not allowed; allowed collections are: {}", allowed_list(.allowed))]
pub struct UnknownCollection {
    pub tag: String,
    pub allowed: Vec<EntityTag>,
}

fn allowed_list(allowed: &[EntityTag]) -> String {
    allowed
        .iter()
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl EntityTag {
    /// Wire name of the collection, also used as the upload folder and listing key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "usuarios",
            Self::Category => "categorias",
            Self::Product => "productos",
        }
    }

    /// Resolves a tag against every known collection.
    pub fn resolve(tag: &str) -> Result<Self, UnknownCollection> {
        Self::resolve_in(tag, ALL_COLLECTIONS)
    }

    /// Resolves a tag, accepting only members of `allowed`. Matching is exact
    /// and case-sensitive.
    pub fn resolve_in(tag: &str, allowed: &[EntityTag]) -> Result<Self, UnknownCollection> {
        allowed
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == tag)
            .ok_or_else(|| UnknownCollection {
                tag: tag.to_string(),
                allowed: allowed.to_vec(),
            })
    }
}

impl Display for EntityTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EntityTag> for &'static str {
    fn from(value: EntityTag) -> Self {
        value.as_str()
    }
}
