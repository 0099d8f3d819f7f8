//! Persistence layer for the spraying operations service.
//!
//! Everything that touches the document store lives here: the
//! [`DocumentStore`](store::DocumentStore) gateway and its backends, the
//! storage-side document models and one repository module per collection.

pub mod db;
pub mod error;
pub mod indexes;
pub mod models;
pub mod pagination;
pub mod patch;
pub mod repos;
pub mod store;

pub use db::{Db, Deadline};
pub use error::{StoreError, StoreResult};
pub use patch::Patch;
