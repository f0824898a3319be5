//! JSON shapes returned by the API.

pub mod auth;
pub mod categories;
pub mod products;
pub mod search;
pub mod users;
