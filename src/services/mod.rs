pub mod auth;
pub mod categories;
pub mod errors;
pub mod products;
pub mod search;
pub mod uploads;
pub mod users;

pub use errors::{ServiceError, ServiceResult};
#[cfg(test)]
pub(crate) mod test_support;
