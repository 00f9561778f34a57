use anyhow::{Context, Result};
use chargelog::config::{Config, RunMode};
use chargelog::logging::init_logging;
use chargelog::monitor::ChargeMonitor;
use chargelog::recorder::SqliteRecorder;
use chargelog::snapshot::{SnapshotOutcome, run_snapshot};
use chargelog::sources::{HttpEnergySource, HttpMileageSource};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!(
        "Chargelog {} ({}) starting in {:?} mode",
        env!("APP_VERSION"),
        env!("APP_GIT_SHA"),
        config.mode
    );

    let energy = HttpEnergySource::from_config(&config.charger, &config.http)
        .context("Failed to set up energy source")?;
    let mileage = HttpMileageSource::from_config(&config.vehicle, &config.http)
        .context("Failed to set up mileage source")?;
    let recorder = SqliteRecorder::from_config(&config.storage);
    recorder
        .initialize()
        .context("Failed to open the session store")?;

    match config.mode {
        RunMode::Snapshot => {
            match run_snapshot(&energy, &mileage, &recorder).await? {
                SnapshotOutcome::Recorded(_) => Ok(()),
                SnapshotOutcome::Incomplete { odometer, energy } => {
                    error!(
                        "Snapshot failed (odometer: {:?}, energy: {:?})",
                        odometer, energy
                    );
                    Err(anyhow::anyhow!("Snapshot incomplete"))
                }
            }
        }
        RunMode::Monitor => {
            let cancel = CancellationToken::new();
            let signal_token = cancel.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                info!("Shutdown signal received");
                signal_token.cancel();
            });

            let mut monitor = ChargeMonitor::new(
                energy,
                mileage,
                recorder,
                Duration::from_secs(config.poll_interval_seconds),
            );
            match monitor.run(cancel).await {
                Ok(()) => {
                    info!("Monitor shutdown complete");
                    Ok(())
                }
                Err(e) => {
                    error!("Monitor failed with error: {}", e);
                    Err(anyhow::anyhow!("Monitor error: {}", e))
                }
            }
        }
    }
}

/// Resolve on Ctrl-C or, on unix, SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
                return;
            }
            Err(e) => warn!("SIGTERM handler unavailable: {}", e),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}
