//! `/users` routes and the rules a user must satisfy before it is written.

pub mod handlers;
mod validation;

pub use validation::{validate_user, ValidationError, MAX_AGE, MAX_NAME_LEN};
