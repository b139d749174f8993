use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use users_service::{configure, AppError, AppState, Settings};

#[actix_web::main]
async fn main() -> users_service::Result<()> {
    // Load environment variables
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Also bridges the `log` records of actix's access logger.
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = Settings::new()?;
    info!("Configuration loaded for environment {}", config.environment);

    let state = AppState::new(config.clone()).await?;
    info!("Connected to {}", config.database.url);
    let data = web::Data::new(state.clone());

    let listener = TcpListener::bind(config.bind_address())?;
    info!("Listening on http://{}", config.bind_address());

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(data.clone())
            .configure(configure)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    info!("Server stopped, closing database");
    state.shutdown().await
}
