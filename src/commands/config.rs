use anyhow::Result;
use colored::Colorize;
use tuition_calculator::config::Config;

/// Execute the config show command
///
/// Prints the effective configuration (file plus environment overrides) as TOML.
pub fn show(cfg: &Config) -> Result<()> {
    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", render(cfg)?);
    Ok(())
}

fn render(cfg: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_round_trips() {
        let cfg = Config::default();
        let rendered = render(&cfg).unwrap();
        assert!(rendered.contains("[server]"));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.server.port, cfg.server.port);
        assert_eq!(parsed.dataset.variable, cfg.dataset.variable);
    }
}
