#![allow(dead_code)]

use actix_web::web;
use users_service::{AppState, Settings};

/// Fresh in-memory store with the `users` table created.
pub async fn test_state() -> web::Data<AppState> {
    test_state_with(|_| {}).await
}

pub async fn test_state_with(adjust: impl FnOnce(&mut Settings)) -> web::Data<AppState> {
    let mut config = Settings::new_for_test().expect("Failed to load test config");
    adjust(&mut config);
    let state = AppState::new(config)
        .await
        .expect("Failed to create test state");
    web::Data::new(state)
}

macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure(users_service::configure),
        )
        .await
    };
}
