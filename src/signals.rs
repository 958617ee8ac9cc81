use anyhow::Result;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::config::Config;
use crate::handlers::AppState;
use crate::{metrics, server};

/// Shutdown signal types
#[derive(Debug, Clone, Copy)]
pub enum ShutdownSignal {
    /// Graceful shutdown (drain connections, clean up)
    Graceful,
}

/// Setup signal handlers for the server
///
/// Returns a broadcast sender for shutdown signals and a join handle for the signal task
///
/// Handles:
/// - SIGTERM/SIGINT: Graceful shutdown
/// - SIGHUP: Dataset artifact reload
#[cfg(unix)]
pub fn setup_signal_handlers(
    config: Arc<Config>,
    state: AppState,
) -> (
    broadcast::Sender<ShutdownSignal>,
    tokio::task::JoinHandle<()>,
) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        let (mut sigterm, mut sigint, mut sighup) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        ) {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            (term, int, hup) => {
                let e = [term.err(), int.err(), hup.err()].into_iter().flatten().next();
                error!("Failed to install signal handlers: {:?}", e);
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sigint.recv() => {
                    info!("SIGINT received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading dataset");
                    if let Err(e) = reload_dataset(&config, &state).await {
                        error!("Failed to reload dataset, keeping the current one: {}", e);
                    } else {
                        info!("Dataset reloaded successfully");
                    }
                }
            }
        }
    });

    (shutdown_tx, handle)
}

/// Non-unix fallback: only Ctrl+C is supported
#[cfg(not(unix))]
pub fn setup_signal_handlers(
    _config: Arc<Config>,
    _state: AppState,
) -> (
    broadcast::Sender<ShutdownSignal>,
    tokio::task::JoinHandle<()>,
) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, initiating shutdown");
                let _ = tx_clone.send(ShutdownSignal::Graceful);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    (shutdown_tx, handle)
}

/// Re-read the dataset artifact and swap in a new calculator
///
/// If loading fails the current calculator stays in place.
pub async fn reload_dataset(config: &Config, state: &AppState) -> Result<()> {
    let dataset = server::load_dataset(&config.dataset).await?;
    let sizes = dataset.section_sizes();

    state
        .calculator
        .store(Arc::new(server::build_calculator(config, dataset)));
    metrics::set_dataset_sizes(&sizes);

    info!(
        base = sizes.base,
        variable = sizes.variable,
        currency = sizes.currency,
        self_governing = sizes.self_governing,
        "Calculator swapped"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::TuitionCalculator;
    use crate::dataset::CanonicalDataset;
    use serde_json::json;

    fn config_with_artifact(path: std::path::PathBuf) -> Config {
        let mut config = Config::default();
        config.dataset.artifact = path;
        config
    }

    fn empty_state() -> AppState {
        AppState::new(TuitionCalculator::new(Arc::new(CanonicalDataset::default())))
    }

    #[tokio::test]
    async fn test_setup_signal_handlers() {
        let (shutdown_tx, _handle) =
            setup_signal_handlers(Arc::new(Config::default()), empty_state());

        let mut rx = shutdown_tx.subscribe();
        shutdown_tx.send(ShutdownSignal::Graceful).unwrap();

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, ShutdownSignal::Graceful));
    }

    #[tokio::test]
    async fn test_reload_swaps_calculator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let dataset: CanonicalDataset =
            serde_json::from_value(json!({"selfGoverning": {"تهران": {"دکتری": 1}}})).unwrap();
        dataset.save(&path).unwrap();

        let state = empty_state();
        reload_dataset(&config_with_artifact(path), &state).await.unwrap();
        assert_eq!(state.calculator().locations(), vec!["تهران"]);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_current() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let dataset: CanonicalDataset =
            serde_json::from_value(json!({"currency": {"دکتری": {}}})).unwrap();
        let state = AppState::new(TuitionCalculator::new(Arc::new(dataset)));

        assert!(reload_dataset(&config_with_artifact(path), &state).await.is_err());
        assert_eq!(state.calculator().currency_degrees(), vec!["دکتری"]);
    }
}
