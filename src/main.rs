//! Sandglass - A state-managed hourglass countdown timer server
//!
//! This is the main entry point for the sandglass application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use sandglass::{
    config::Config,
    state::AppState,
    api::create_router,
    services::{HookAlarm, LogPresenter},
    tasks::spawn_engine,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("sandglass={},tower_http=info", config.log_level()))
        .init();

    info!("Starting sandglass server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}m {}s",
          config.host, config.port, config.minutes, config.seconds);

    // Start the engine driver task that owns the timer
    let engine = spawn_engine(
        config.default_duration(),
        LogPresenter::new(),
        HookAlarm::new(config.alarm_config()),
    );

    // Create application state
    let state = Arc::new(AppState::new(&config, engine.action_tx.clone(), engine.snapshot_rx.clone()));
    state.log_summary();

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  PUT  /duration      - Set minutes/seconds of the next run");
    info!("  POST /start         - Start the countdown");
    info!("  POST /pause         - Pause the countdown");
    info!("  POST /resume        - Resume a paused countdown");
    info!("  POST /reset         - Reset to the configured duration");
    info!("  POST /add-time      - Extend a running countdown");
    info!("  POST /preset/:min   - Select a preset");
    info!("  POST /chain         - Select the chained preset ({}m -> {}m)",
          config.chain_first, config.chain_second);
    info!("  GET  /presets       - List presets");
    info!("  GET  /status        - Current timer status");
    info!("  GET  /events        - Server-sent timer updates");
    info!("  GET  /health        - Health check");

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

    engine.task.abort();
    info!("Server shutdown complete");
    Ok(())
}
