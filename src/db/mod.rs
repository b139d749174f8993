//! Data store gateway for the `users` table.
//!
//! Every statement goes through bound parameters; the store owns durability
//! and concurrency control.

pub mod models;
pub mod operations;
pub mod schema;

pub use models::User;
pub use operations::{DbOperations, DbPoolStatus};
pub use schema::ensure_schema;
