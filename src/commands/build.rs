use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;
use tuition_calculator::{config::Config, ingest};

/// Execute the build command
///
/// Reads every configured workbook, normalizes it and writes the artifact.
pub fn execute(mut cfg: Config, source_dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    if let Some(dir) = source_dir {
        cfg.dataset.source_dir = dir;
    }
    if let Some(path) = output {
        cfg.dataset.artifact = path;
    }

    println!(
        "{} {}",
        "Building dataset from".yellow(),
        cfg.dataset.source_dir.display()
    );
    info!(source_dir = %cfg.dataset.source_dir.display(), "Building dataset");

    let dataset = ingest::build_dataset(&cfg.dataset)?;
    dataset.save(&cfg.dataset.artifact)?;

    let sizes = dataset.section_sizes();
    println!("{}", "✓ Dataset built".green());
    println!();
    println!("{}", "Sections:".bold());
    println!("  {}: {} field groups", "base".cyan(), sizes.base);
    println!("  {}: {} degrees", "variable".cyan(), sizes.variable);
    println!("  {}: {} degrees", "currency".cyan(), sizes.currency);
    println!("  {}: {} locations", "selfGoverning".cyan(), sizes.self_governing);
    println!();
    println!("  {}: {}", "Artifact".cyan(), cfg.dataset.artifact.display());

    if dataset.is_empty() {
        println!(
            "{}",
            "Warning: no source workbooks were found, the artifact is empty".red()
        );
    }

    Ok(())
}
