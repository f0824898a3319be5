use serde::Serialize;

use crate::dto::categories::CategoryDto;
use crate::dto::products::ProductDto;
use crate::dto::users::UserDto;

/// Matches of a search, all of the searched collection's type.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SearchResults {
    Users(Vec<UserDto>),
    Categories(Vec<CategoryDto>),
    Products(Vec<ProductDto>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            Self::Users(items) => items.len(),
            Self::Categories(items) => items.len(),
            Self::Products(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response envelope of the search endpoint.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: SearchResults,
}

/// Entity whose image was replaced.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AttachmentOwner {
    User(UserDto),
    Product(ProductDto),
}
