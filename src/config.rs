use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Allow cross-origin requests from the selection form
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            cors_permissive: default_cors_permissive(),
        }
    }
}

/// Where the dataset artifact lives and which workbooks it is built from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Normalized JSON artifact served by the query service
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,

    /// Directory holding the source workbooks
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Build the artifact from `source_dir` at startup when it does not exist
    #[serde(default)]
    pub build_on_start: bool,

    #[serde(default = "default_base_file")]
    pub base_file: String,

    #[serde(default = "default_currency_file")]
    pub currency_file: String,

    #[serde(default = "default_self_governing_file")]
    pub self_governing_file: String,

    /// Prefix stripped from variable-tuition sheet names to get the unit type
    #[serde(default = "default_unit_sheet_prefix")]
    pub unit_sheet_prefix: String,

    /// One workbook per degree; every sheet is a unit type
    #[serde(default = "default_variable_sources")]
    pub variable: Vec<VariableSource>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            artifact: default_artifact(),
            source_dir: default_source_dir(),
            build_on_start: false,
            base_file: default_base_file(),
            currency_file: default_currency_file(),
            self_governing_file: default_self_governing_file(),
            unit_sheet_prefix: default_unit_sheet_prefix(),
            variable: default_variable_sources(),
        }
    }
}

impl DatasetConfig {
    pub fn source_path(&self, file: &str) -> PathBuf {
        self.source_dir.join(file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VariableSource {
    pub degree: String,
    pub file: String,
}

impl VariableSource {
    fn new(degree: &str) -> Self {
        Self {
            degree: degree.to_string(),
            file: format!("شهریه متغیر {}.xlsx", degree),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalculatorConfig {
    /// Unit type whose table lists the field groups of a degree
    #[serde(default = "default_field_group_unit_type")]
    pub field_group_unit_type: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            field_group_unit_type: default_field_group_unit_type(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            endpoint: default_metrics_endpoint(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_cors_permissive() -> bool {
    true
}

fn default_artifact() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_base_file() -> String {
    "شهریه پایه.xlsx".to_string()
}

fn default_currency_file() -> String {
    "شهریه ارزی.xlsx".to_string()
}

fn default_self_governing_file() -> String {
    "شهریه خودگردان.xlsx".to_string()
}

fn default_unit_sheet_prefix() -> String {
    "شهریه واحد".to_string()
}

/// Continuous and discontinuous programs are priced separately.
fn default_variable_sources() -> Vec<VariableSource> {
    [
        "کاردانی پیوسته",
        "کاردانی ناپیوسته",
        "کارشناسی پیوسته",
        "کارشناسی ناپیوسته",
        "کارشناسی ارشد پیوسته",
        "کارشناسی ارشد ناپیوسته",
        "دکتری تخصصی",
    ]
    .into_iter()
    .map(VariableSource::new)
    .collect()
}

fn default_field_group_unit_type() -> String {
    crate::calculator::DEFAULT_FIELD_GROUP_UNIT_TYPE.to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_endpoint() -> String {
    "/metrics".to_string()
}

/// Load configuration from an optional file, overridden by `TUITION__*`
/// environment variables (e.g. `TUITION__SERVER__PORT=8080`).
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("TUITION").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if !matches!(cfg.server.log_format.as_str(), "text" | "json") {
        anyhow::bail!(
            "server.log_format must be \"text\" or \"json\", got '{}'",
            cfg.server.log_format
        );
    }

    if cfg.dataset.artifact.as_os_str().is_empty() {
        anyhow::bail!("dataset.artifact cannot be empty");
    }

    for (name, file) in [
        ("base_file", &cfg.dataset.base_file),
        ("currency_file", &cfg.dataset.currency_file),
        ("self_governing_file", &cfg.dataset.self_governing_file),
    ] {
        if file.trim().is_empty() {
            anyhow::bail!("dataset.{} cannot be empty", name);
        }
    }

    // Validate variable workbooks have distinct, non-empty degrees
    let mut degrees = std::collections::HashSet::new();
    for source in &cfg.dataset.variable {
        let degree = crate::normalize::normalize_text(&source.degree);
        if degree.is_empty() {
            anyhow::bail!("dataset.variable entry for '{}' has an empty degree", source.file);
        }
        if source.file.trim().is_empty() {
            anyhow::bail!("dataset.variable entry '{}' has an empty file", degree);
        }
        if !degrees.insert(degree.clone()) {
            anyhow::bail!("dataset.variable degree '{}' is duplicated", degree);
        }
    }

    if crate::normalize::normalize_text(&cfg.calculator.field_group_unit_type).is_empty() {
        anyhow::bail!("calculator.field_group_unit_type cannot be empty");
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!(
            "metrics.endpoint must start with '/', got '{}'",
            cfg.metrics.endpoint
        );
    }

    Ok(())
}
