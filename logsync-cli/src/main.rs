//! # logsync CLI
//!
//! Command-line interface for converting mapped Logseq pages into Hugo
//! content.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "logsync.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert mapped pages and write them into the destination repository
    Convert {
        /// Only convert these sources (paths as written in the mappings)
        #[arg(long, value_delimiter = ',')]
        only: Vec<PathBuf>,
    },

    /// Convert a single mapped page and print it instead of saving
    ///
    /// Attachments are still copied into the destination `static` folder
    /// when the mapping enables `include_attachments`.
    Render {
        /// Source path as written in the mapping
        source: PathBuf,
    },

    /// Validate the configuration file
    Check {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `render` output stays clean
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Convert { only } => commands::convert_pages(&cli.config, &only),
        Commands::Render { source } => commands::render_page(&cli.config, &source),
        Commands::Check { json } => commands::check_config(&cli.config, json),
    }
}
