use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use dosewatch::core_state::CoreState;
use dosewatch::notify::LogSink;
use dosewatch::{api, config, db, notify};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::database_path();
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!(error = %e, path = %parent.display(), "Cannot create data directory");
            std::process::exit(1);
        }
    }

    // Migrate eagerly so a broken schema fails at startup, not mid-request
    if let Err(e) = db::open_database(&db_path) {
        tracing::error!(error = %e, path = %db_path.display(), "Cannot open schedule database");
        std::process::exit(1);
    }
    tracing::info!(path = %db_path.display(), "Schedule database ready");

    let core = Arc::new(CoreState::new(db_path));

    let mut server = match api::start_server(core.clone(), config::bind_addr()).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start API server");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %server.addr, "Listening");

    let mut poller = if config::poller_enabled() {
        Some(notify::start_poller(
            core,
            Arc::new(LogSink),
            Duration::from_secs(config::POLL_INTERVAL_SECS),
        ))
    } else {
        None
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Cannot listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");

    if let Some(poller) = poller.as_mut() {
        poller.shutdown();
    }
    server.shutdown();
}
