use std::sync::Arc;

use askgod_domain::Config;
use askgod_infrastructure::{EventBus, EventBusLayer};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the log pipeline: stderr, the optional log file and the event
/// bus bridge (which turns every record into a `logging` event).
pub fn init_logging(config: &Config, bus: Arc<EventBus>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.daemon.log_level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!(e))?;

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let file_layer = if config.daemon.log_file.is_empty() {
        None
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.daemon.log_file)?;

        Some(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .with(EventBusLayer::new(bus))
        .init();

    info!(level = %config.daemon.log_level, "Logging initialized");
    Ok(())
}
