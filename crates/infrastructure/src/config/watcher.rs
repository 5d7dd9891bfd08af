//! Filesystem watch on the configuration file.

use std::sync::Arc;
use std::time::Duration;

use askgod_domain::StoreError;
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{error, info};

use super::ConfigManager;

/// Watch the config file's directory and reload on writes to the file.
///
/// The watch is on the parent directory because editors and configuration
/// management tools typically replace the file rather than write in place.
pub fn spawn(manager: Arc<ConfigManager>) -> Result<(), StoreError> {
    let path = manager.path.clone();
    let directory = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());

    info!(path = %path.display(), "Setting up configuration watch");

    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |result| {
        let _ = tx.send(result);
    })
    .map_err(|e| StoreError::InvalidInput(format!("Unable to set up file watch: {}", e)))?;

    watcher
        .watch(&directory, RecursiveMode::NonRecursive)
        .map_err(|e| StoreError::InvalidInput(format!("Unable to watch {}: {}", directory.display(), e)))?;

    tokio::spawn(async move {
        // The watcher stops when dropped; tie its lifetime to the task.
        let _watcher = watcher;

        while let Some(result) = rx.recv().await {
            let event = match result {
                Ok(event) => event,
                Err(err) => {
                    error!(error = %err, "Got bad file notification");
                    continue;
                }
            };

            let matches = event
                .paths
                .iter()
                .any(|p| p == &path || p.file_name() == path.file_name());
            if !matches {
                continue;
            }

            // Give rename/replace sequences a moment to settle.
            tokio::time::sleep(Duration::from_secs(1)).await;

            // Drain whatever piled up during the sleep so one edit doesn't
            // trigger a burst of reloads.
            while rx.try_recv().is_ok() {}

            if let Err(err) = manager.reload_from_file().await {
                error!(error = %err, "Failed to read the new configuration");
            }
        }
    });

    Ok(())
}
