//! The `caption config` command for configuration management.

use caption_core::Config;
use clap::{Args, Subcommand};
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Show config file path
    Path,

    /// Write a config file with defaults for every provider
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Load and validate the config file
    Check,
}

/// Defaults plus every provider section filled in, so `init` writes a file
/// that shows all the knobs.
fn starter_config() -> Config {
    let mut config = Config::default();
    config.llm.openai = Some(Default::default());
    config.llm.anthropic = Some(Default::default());
    config.llm.ollama = Some(Default::default());
    config
}

fn write_starter_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, starter_config().to_toml()?)?;
    Ok(())
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_starter_config(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Check => {
            let path = Config::default_path();
            if !path.exists() {
                println!("No config file at {} (using defaults)", path.display());
                return Ok(());
            }
            let config = Config::load_from(&path)?;
            println!(
                "{} is valid (provider: {})",
                path.display(),
                config.llm.provider
            );
        }
    }

    Ok(())
}
