use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    calculator::TuitionCalculator,
    config::{Config, DatasetConfig},
    dataset::CanonicalDataset,
    error::AppError,
    handlers::{self, AppState},
    ingest, metrics,
    signals::setup_signal_handlers,
};

/// Start the tuition calculator service
///
/// This function:
/// 1. Loads (or builds) the dataset artifact
/// 2. Initializes metrics
/// 3. Sets up signal handlers for graceful shutdown and dataset reload
/// 4. Binds to the configured address and serves until shutdown
pub async fn start_server(config: Config) -> Result<()> {
    let dataset = load_or_build_dataset(&config.dataset).await?;
    let sizes = dataset.section_sizes();
    let state = AppState::new(build_calculator(&config, dataset));

    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        let handle = Arc::new(metrics::init_metrics()?);
        metrics::set_dataset_sizes(&sizes);
        Some(handle)
    } else {
        None
    };

    let config = Arc::new(config);
    let (shutdown_tx, signal_handle) = setup_signal_handlers(config.clone(), state.clone());
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(&config, state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting tuition calculator on {}", addr);
    info!(
        "Dataset: {} base field groups, {} variable degrees, {} currency degrees, {} locations",
        sizes.base, sizes.variable, sizes.currency, sizes.self_governing
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    config: &Config,
    state: AppState,
    metrics_handle: Option<Arc<PrometheusHandle>>,
) -> Router {
    let api_routes = Router::new()
        .route("/api/data", get(handlers::data::dataset))
        .route("/api/options/degrees", get(handlers::options::degrees))
        .route("/api/options/field-groups", get(handlers::options::field_groups))
        .route("/api/options/levels", get(handlers::options::levels))
        .route("/api/options/locations", get(handlers::options::locations))
        .route(
            "/api/options/self-governing-degrees",
            get(handlers::options::self_governing_degrees),
        )
        .route(
            "/api/options/currency-degrees",
            get(handlers::options::currency_degrees),
        )
        .route(
            "/api/options/currency-field-groups",
            get(handlers::options::currency_field_groups),
        )
        .route(
            "/api/options/currency-levels",
            get(handlers::options::currency_levels),
        )
        .route("/api/calculate", post(handlers::calculate::calculate_standard))
        .route(
            "/api/calculate-self-governing",
            post(handlers::calculate::calculate_self_governing),
        )
        .route(
            "/api/calculate-currency",
            post(handlers::calculate::calculate_currency),
        )
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(state);

    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route(&config.metrics.endpoint, get(handlers::metrics_handler::metrics))
                .with_state(handle),
        );
    }

    // Selections are tiny; 1MB is plenty
    let router = router
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TraceLayer::new_for_http());

    if config.server.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

pub fn build_calculator(config: &Config, dataset: CanonicalDataset) -> TuitionCalculator {
    TuitionCalculator::new(Arc::new(dataset))
        .with_field_group_unit_type(&config.calculator.field_group_unit_type)
}

/// Load the dataset artifact, building it from the source workbooks first when
/// it is missing and `build_on_start` is set.
pub async fn load_or_build_dataset(config: &DatasetConfig) -> Result<CanonicalDataset, AppError> {
    if config.artifact.is_file() {
        return load_dataset(config).await;
    }

    if !config.build_on_start {
        return Err(AppError::DatasetUnavailable(format!(
            "artifact {} not found; run `tuition build` or set dataset.build_on_start",
            config.artifact.display()
        )));
    }

    warn!(
        "Artifact {} not found, building from {}",
        config.artifact.display(),
        config.source_dir.display()
    );
    build_and_save_dataset(config.clone()).await
}

/// Read the artifact on a blocking thread
pub async fn load_dataset(config: &DatasetConfig) -> Result<CanonicalDataset, AppError> {
    let path = config.artifact.clone();
    let dataset = tokio::task::spawn_blocking(move || CanonicalDataset::load(&path))
        .await
        .map_err(|e| AppError::InternalError(format!("dataset load task failed: {}", e)))??;

    info!("Loaded dataset artifact {}", config.artifact.display());
    Ok(dataset)
}

/// Build from the source workbooks and write the artifact, on a blocking thread
pub async fn build_and_save_dataset(config: DatasetConfig) -> Result<CanonicalDataset, AppError> {
    tokio::task::spawn_blocking(move || -> Result<CanonicalDataset, AppError> {
        let dataset = ingest::build_dataset(&config)?;
        dataset.save(&config.artifact)?;
        Ok(dataset)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("dataset build task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_artifact_without_build_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            artifact: dir.path().join("data.json"),
            ..Default::default()
        };

        let err = load_or_build_dataset(&config).await.unwrap_err();
        assert!(matches!(err, AppError::DatasetUnavailable(_)));
    }

    #[tokio::test]
    async fn test_build_on_start_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            artifact: dir.path().join("out/data.json"),
            source_dir: dir.path().to_path_buf(),
            build_on_start: true,
            ..Default::default()
        };

        let dataset = load_or_build_dataset(&config).await.unwrap();
        assert!(dataset.is_empty());
        assert!(config.artifact.is_file());

        let reloaded = load_or_build_dataset(&config).await.unwrap();
        assert_eq!(reloaded, dataset);
    }

    #[tokio::test]
    async fn test_build_on_start_missing_sources_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            artifact: dir.path().join("data.json"),
            source_dir: dir.path().join("absent"),
            build_on_start: true,
            ..Default::default()
        };

        let err = load_or_build_dataset(&config).await.unwrap_err();
        assert!(matches!(err, AppError::DatasetUnavailable(_)));
        assert!(!config.artifact.exists());
    }
}
