use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::dataset::SectionSizes;

/// Initialize Prometheus metrics exporter
///
/// Fails if a global recorder is already installed.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!("tuition_quotes_total", "Total number of tuition quotes computed");
    describe_counter!(
        "tuition_validation_failures_total",
        "Quote requests rejected for missing selections"
    );
    describe_counter!(
        "tuition_option_not_found_total",
        "Option queries whose parent selection does not exist"
    );
    describe_gauge!(
        "tuition_dataset_entries",
        "Top-level entries per dataset section"
    );
    describe_gauge!("tuition_calculator_info", "Service version information");

    gauge!("tuition_calculator_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a computed quote (`standard`, `self_governing`, `currency`)
pub fn record_quote(kind: &str) {
    counter!("tuition_quotes_total", "kind" => kind.to_string()).increment(1);
}

/// Record a quote rejected by validation
pub fn record_validation_failure(kind: &str) {
    counter!("tuition_validation_failures_total", "kind" => kind.to_string()).increment(1);
}

/// Record an option query that found no parent selection
pub fn record_option_not_found(query: &str) {
    counter!("tuition_option_not_found_total", "query" => query.to_string()).increment(1);
}

/// Publish the size of each dataset section
pub fn set_dataset_sizes(sizes: &SectionSizes) {
    for (section, size) in [
        ("base", sizes.base),
        ("variable", sizes.variable),
        ("currency", sizes.currency),
        ("selfGoverning", sizes.self_governing),
    ] {
        gauge!("tuition_dataset_entries", "section" => section).set(size as f64);
    }
}
