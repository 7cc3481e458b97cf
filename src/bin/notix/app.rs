use std::path::PathBuf;
use std::sync::Arc;

use async_channel::{TrySendError, bounded};
use notix::Result;
use notix::config::Config;
use notix::telemetry::init_tracing;
use notix::{Snapshot, ToastManager};
use tokio::signal;
use tracing::{info, warn};

use super::cli::Cli;
use super::renderer::Renderer;
use super::scenarios;

const DEFAULT_CONFIG: &str = "notix.toml";

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = Config::from_env_and_file(&config_path)?;
    if let Some(position) = cli.position {
        config.default_position = position;
    }
    if let Some(duration) = cli.duration {
        config.engine.default_duration = duration;
    }

    let manager = ToastManager::from_config(&config)?;
    info!(
        position = %config.default_position,
        duration = %config.engine.default_duration,
        animation = %config.engine.default_animation,
        scenario = ?cli.scenario,
        "starting playback"
    );

    let (tx, rx) = bounded::<Snapshot>(config.queue_capacity);
    let frames = tx.clone();
    let subscription = manager.subscribe(move |snapshot| {
        match frames.try_send(Arc::clone(snapshot)) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(dropped)) => {
                warn!(toasts = dropped.len(), "snapshot queue full; dropping frame");
            }
        }
    });
    let renderer = tokio::spawn(Renderer::new(manager.clone(), cli.snapshot_format).run(rx));

    tokio::select! {
        biased;
        _ = signal::ctrl_c() => {
            info!("shutdown signal received, stopping playback");
        }
        () = scenarios::play(&manager, cli.scenario) => {
            info!("playback finished");
        }
    }

    subscription.unsubscribe();
    tx.close();
    if let Err(err) = renderer.await {
        warn!(error = %err, "renderer task terminated unexpectedly");
    }

    let leftover = manager.clear(None);
    if !leftover.is_empty() {
        info!(toasts = leftover.len(), "cleared remaining toasts");
    }
    Ok(())
}
