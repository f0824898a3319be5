//! Core library exports for the catalog service.
//!
//! The `data` feature builds the persistence layer on its own: domain types,
//! Diesel rows, the schema and the repositories. The `server` feature adds
//! the JSON API on top of it: request forms, validation, services, storage
//! backends, authentication and the Actix routes.

pub mod db;
pub mod domain;
pub mod models;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod storage;
#[cfg(feature = "server")]
pub mod validation;
