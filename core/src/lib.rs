#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

pub mod entity;
pub mod error;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod query;
pub mod schema;
pub mod store;

// Re-export commonly used types
pub use entity::{Doc, Entity, Reference};
pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use models::Note;
pub use pagination::{PageRequest, Paginated, SortKey, DEFAULT_LIMIT};
pub use query::{FindMany, FindOne, Period};
pub use store::{open_store, validate_id, Collection, Store};
