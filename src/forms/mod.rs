//! Request bodies, query strings and path segments accepted by the API,
//! plus their conversion into domain values.

use serde::Deserialize;

pub mod auth;
pub mod categories;
pub mod pagination;
pub mod products;
pub mod uploads;
pub mod users;

/// `/{id}` path segment. Kept as text so malformed ids reach the checks.
#[derive(Debug, Clone, Deserialize)]
pub struct IdPath {
    pub id: String,
}

/// Value of `id` for checks that read it.
pub fn path_id(path: &IdPath) -> Option<String> {
    Some(path.id.clone())
}

/// `/{coleccion}/{termino}` path segments of the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPath {
    pub coleccion: String,
    pub termino: String,
}
