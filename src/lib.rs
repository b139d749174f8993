pub mod config;
pub mod db;
pub mod error;
pub mod users;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

pub use config::Settings;
pub use db::{DbOperations, User};
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

/// Health check endpoint handler
/// Returns a JSON response with server status, timestamp and pool usage
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "database": state.db.get_pool_status(),
    }))
}

/// Registers every route the service exposes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(users::handlers::configure);
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: DbOperations,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::connect(&config.database).await?;

        if config.database.create_schema {
            db::ensure_schema(db.pool()).await?;
            info!("Schema ready");
        }

        Ok(Self {
            config: Arc::new(config),
            db,
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.db.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_creation() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let state = AppState::new(config).await.expect("Failed to build state");

        assert!(state.db.list_users().await.unwrap().is_empty());
        state.shutdown().await.unwrap();
        assert!(state.db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_app_state_bad_database_url() {
        let mut config = Settings::new_for_test().expect("Failed to load test config");
        config.database.url = "sqlite://missing-dir/nested/users.db".to_string();

        let state = AppState::new(config).await;
        assert!(matches!(state, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_app_state_clone() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let state = AppState::new(config).await.unwrap();
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.config, &cloned.config));

        // both handles see the same store
        state.db.insert_user("Alice", 30).await.unwrap();
        assert_eq!(cloned.db.list_users().await.unwrap().len(), 1);
    }
}
