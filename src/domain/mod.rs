//! Domain entities and value objects, independent of HTTP and persistence.

pub mod attachment;
pub mod category;
pub mod collection;
pub mod product;
pub mod role;
pub mod types;
pub mod user;
