//! The askgod daemon.

mod bootstrap;
mod listeners;

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use askgod_api::{create_router, metrics, AppState};
use askgod_application::{AccessResolver, SharedConfig, SubmissionService};
use askgod_domain::Config;
use askgod_infrastructure::repositories::{
    PgConfigRepository, PgFlagRepository, PgScoreRepository, PgTeamRepository,
};
use askgod_infrastructure::{config, tls, ClusterRelay, ConfigManager, EventBus};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser)]
#[command(name = "askgod-server")]
#[command(about = "CTF scoring system - server")]
struct Cli {
    /// Path to the YAML configuration file
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The recorder must exist before the first counter is touched.
    let prometheus = metrics::setup_metrics_recorder();

    let boot_config = Config::from_file(&cli.config)?;
    let handle: SharedConfig = Arc::new(ArcSwap::from_pointee(boot_config));

    // The bus is wired into the log pipeline, so both exist before the
    // database comes up.
    let bus = Arc::new(EventBus::new(handle.clone()));
    bootstrap::logging::init_logging(&handle.load_full(), bus.clone())?;

    info!("Starting askgod daemon");

    let pool = bootstrap::database::init_database(&handle.load_full().database).await?;

    let teams = Arc::new(PgTeamRepository::new(pool.clone()));
    let flags = Arc::new(PgFlagRepository::new(pool.clone()));
    let scores = Arc::new(PgScoreRepository::new(pool.clone()));
    let config_store = Arc::new(PgConfigRepository::new(pool.clone()));

    // Merge the persisted editable config and keep watching the file.
    let config_manager = ConfigManager::new(handle.clone(), cli.config.clone(), config_store);
    config_manager.merge_store().await?;
    config::watcher::spawn(config_manager.clone())?;

    bus.set_hidden_teams(config_manager.current().hidden_team_ids());

    let access = Arc::new(AccessResolver::new(handle.clone()));
    access.resolve_peers().await;

    // Keep derived state in sync with config changes from any source.
    {
        let mut changes = config_manager.subscribe();
        let bus = bus.clone();
        let access = access.clone();

        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(config) => {
                        bus.set_hidden_teams(config.hidden_team_ids());
                        access.resolve_peers().await;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    let submission = Arc::new(SubmissionService::new(
        handle.clone(),
        teams.clone(),
        flags.clone(),
        scores.clone(),
        bus.clone(),
    ));

    let state = AppState {
        config: handle.clone(),
        config_manager: config_manager.clone(),
        access,
        bus: bus.clone(),
        teams,
        flags,
        scores,
        submission,
    };

    let router = create_router(state);

    // Mirror events to and from the other cluster members.
    ClusterRelay::new(bus, config_manager).spawn_forwarders();

    let running_config = handle.load_full();
    let daemon = &running_config.daemon;
    let (failures, mut first_failure) = mpsc::channel::<anyhow::Error>(1);
    let mut bound = false;

    if daemon.http_port > 0 {
        bound = true;
        let router = router.clone();
        let failures = failures.clone();
        let (port, haproxy) = (daemon.http_port, daemon.haproxy_header);

        tokio::spawn(async move {
            if let Err(err) = listeners::serve_http(router, port, haproxy).await {
                let _ = failures.send(err).await;
            }
        });
    }

    if daemon.https_port > 0 {
        bound = true;
        let tls_config = tls::server_config(&daemon.https_certificate, &daemon.https_key)?;
        let router = router.clone();
        let failures = failures.clone();
        let (port, haproxy) = (daemon.https_port, daemon.haproxy_header);

        tokio::spawn(async move {
            if let Err(err) = listeners::serve_https(router, port, haproxy, tls_config).await {
                let _ = failures.send(err).await;
            }
        });
    }

    if daemon.prometheus_port > 0 {
        let metrics_router = metrics::metrics_router(prometheus);
        let failures = failures.clone();
        let port = daemon.prometheus_port;

        tokio::spawn(async move {
            if let Err(err) = listeners::serve_prometheus(metrics_router, port).await {
                let _ = failures.send(err).await;
            }
        });
    }

    if !bound {
        anyhow::bail!("No HTTP or HTTPS listener configured");
    }

    // Run until a listener dies.
    match first_failure.recv().await {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
