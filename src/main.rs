use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use tuition_calculator::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // Version needs no configuration
    if let cli::Commands::Version = command {
        print_version();
        return Ok(());
    }

    let cfg = config::load_config(&args.config)?;
    init_tracing(&cfg.server.log_level, &cfg.server.log_format);

    match command {
        cli::Commands::Start { build } => {
            commands::start::execute(cfg, build).await?;
        }
        cli::Commands::Build { source_dir, output } => {
            commands::build::execute(cfg, source_dir, output)?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config, &cfg)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg)?,
        },
        cli::Commands::Version => print_version(),
    }

    Ok(())
}

fn print_version() {
    println!("Tuition Calculator v{}", env!("CARGO_PKG_VERSION"));
}
