//! Diesel row types and the service configuration model.

pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod product;
pub mod role;
pub mod user;
