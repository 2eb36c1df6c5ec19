use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use kitchen_queue::api;
use kitchen_queue::config::Config;
use kitchen_queue::engine::clock::SystemClock;
use kitchen_queue::error::AppError;
use kitchen_queue::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let state = Arc::new(AppState::new(
        config.event_buffer_size,
        config.dashboard,
        Arc::new(SystemClock),
    ));

    let app = api::rest::router(state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port = config.http_port,
        refresh_secs = config.dashboard.refresh.as_secs(),
        alert_check_secs = config.dashboard.alert_check.as_secs(),
        "http server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
