//! rstx CLI - reStructuredText code embedding.
//!
//! Provides commands for:
//! - `build`: Expand directives in `.rstx` files into `.rst` files
//! - `directives`: List the available directives

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, DirectivesArgs};
use output::Output;

/// rstx - Embed code, its output, and figures in reStructuredText.
#[derive(Parser)]
#[command(name = "rstx", version, about)]
struct Cli {
    /// Enable verbose output (log each directive and written file).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand directives in `.rstx` files.
    Build(BuildArgs),
    /// List available directives.
    Directives(DirectivesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Directives(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
