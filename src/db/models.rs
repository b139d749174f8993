use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted user row. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i64,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, age: i64) -> Self {
        Self {
            id,
            name: name.into(),
            age,
        }
    }
}
