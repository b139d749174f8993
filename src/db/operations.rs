use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::db::models::User;
use crate::error::DatabaseError;

#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<SqlitePool>,
}

impl DbOperations {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?
            .create_if_missing(config.create_if_missing);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        // An in-memory database lives only as long as its connection.
        if config.url.contains(":memory:") {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Ok(Self::new(Arc::new(pool)))
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool.as_ref()
    }

    pub fn get_pool_status(&self) -> DbPoolStatus {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;

        DbPoolStatus {
            total_connections: size,
            active_connections: size.saturating_sub(idle),
            idle_connections: idle,
        }
    }

    /// Inserts a row and returns it with the id the store assigned.
    pub async fn insert_user(&self, name: &str, age: i64) -> Result<User, DatabaseError> {
        let result = sqlx::query("INSERT INTO users (name, age) VALUES (?, ?)")
            .bind(name)
            .bind(age)
            .execute(self.pool.as_ref())
            .await?;

        Ok(User::new(result.last_insert_rowid(), name, age))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, age FROM users ORDER BY id")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(users)
    }

    /// Fails with `DatabaseError::NoRows` when no row has this id.
    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, age FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(user)
    }

    /// Returns the number of rows affected; zero means no such id.
    pub async fn update_user(&self, id: i64, name: &str, age: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE users SET name = ?, age = ? WHERE id = ?")
            .bind(name)
            .bind(age)
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    /// Returns the number of rows affected; zero means no such id.
    pub async fn delete_user(&self, id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DbPoolStatus {
    pub total_connections: u32,
    pub active_connections: u32,
    pub idle_connections: u32,
}
