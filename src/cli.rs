use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tuition", version, about = "University tuition calculator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the query service (default)
    Start {
        /// Build the artifact from the source workbooks if it is missing
        #[arg(short, long)]
        build: bool,
    },

    /// Build the dataset artifact from the source workbooks
    Build {
        /// Directory holding the source workbooks (overrides dataset.source_dir)
        #[arg(short, long)]
        source_dir: Option<PathBuf>,

        /// Artifact path to write (overrides dataset.artifact)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Test configuration and artifact validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start { build: false })
    }
}
