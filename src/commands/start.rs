use anyhow::Result;
use colored::Colorize;
use tracing::info;
use tuition_calculator::{config::Config, server};

/// Execute the start command
///
/// `build` forces `dataset.build_on_start` for this run.
pub async fn execute(mut cfg: Config, build: bool) -> Result<()> {
    println!("{}", "Starting tuition calculator...".green());

    if build {
        cfg.dataset.build_on_start = true;
    }

    info!(
        artifact = %cfg.dataset.artifact.display(),
        build_on_start = cfg.dataset.build_on_start,
        "Starting tuition calculator"
    );

    // Blocks until shutdown
    server::start_server(cfg).await?;

    Ok(())
}
