use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use convslice::cli::{extract, split, titles, truncate};
use convslice::config::Config;

#[derive(Parser)]
#[command(name = "convslice", version)]
#[command(about = "Split, trim, index and excerpt exported AI conversation archives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "convslice.yaml", global = true)]
    config: String,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split the full export into time-ordered chunk files
    Split,

    /// Keep only the first conversations of a chunk
    Truncate,

    /// Write a CSV index of a chunk's titles and creation times
    Titles,

    /// Write a plaintext transcript of a chunk's first conversations
    Extract,
}

/// Priority: `--verbose` > `RUST_LOG` env var > default (warn).
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("convslice=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Split => {
            split::run(&config.split)?;
        }
        Commands::Truncate => {
            truncate::run(&config.truncate)?;
        }
        Commands::Titles => {
            titles::run(&config.titles)?;
        }
        Commands::Extract => {
            extract::run(&config.extract)?;
        }
    }

    Ok(())
}
