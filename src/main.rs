//! Countdown Timer - A state-managed HTTP countdown timer
//!
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::TokioScheduler,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, initial={}:{}:{}, tick={}ms",
          config.host, config.port, config.hour, config.minute, config.second, config.tick_ms);

    // Create the timer state holder; it owns the ticker from here on
    let state = Arc::new(AppState::new(&config, Arc::new(TokioScheduler::new())));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer          - Current fields, display and message");
    info!("  PUT  /timer/:field   - Set hour, minute or second");
    info!("  POST /timer/toggle   - Start or stop the countdown");
    info!("  POST /timer/start    - Start the countdown");
    info!("  POST /timer/stop     - Stop the countdown");
    info!("  GET  /events         - Server-sent timer events");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
