//! Caption CLI - social media captions, caption edits, and image descriptions
//! from an LLM.
//!
//! # Usage
//!
//! ```bash
//! # Write a caption for one or more platforms
//! caption generate --platform Instagram --post-type Promotion --topic "Weekend sale"
//!
//! # Rework an existing caption
//! caption edit --platform LinkedIn --edit-type "more formal" --caption "we're hiring!!"
//!
//! # Describe an image for caption context
//! caption describe ./photo.jpg --llm anthropic
//!
//! # View configuration
//! caption config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Caption - LLM-written social media captions and hashtags.
#[derive(Parser, Debug)]
#[command(name = "caption")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a caption with hashtags
    Generate(cli::generate::GenerateArgs),

    /// Edit an existing caption
    Edit(cli::generate::EditArgs),

    /// Describe an image
    Describe(cli::describe::DescribeArgs),

    /// Print a rendered prompt without calling any provider
    Prompt(cli::prompt::PromptArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match caption_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `caption config path`."
            );
            caption_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Caption v{}", caption_core::VERSION);

    match cli.command {
        Commands::Generate(args) => cli::generate::execute_generate(args, &config).await,
        Commands::Edit(args) => cli::generate::execute_edit(args, &config).await,
        Commands::Describe(args) => cli::describe::execute(args, &config).await,
        Commands::Prompt(args) => cli::prompt::execute(args),
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
